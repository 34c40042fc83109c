//! Request locale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A BCP-47-ish locale split into its first three subtags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// Lower-case language subtag, e.g. `en`.
    pub language: String,
    /// Upper-case region subtag, e.g. `US`.
    pub region: Option<String>,
    /// Variant subtag, kept verbatim.
    pub variant: Option<String>,
}

impl Locale {
    /// Language used when the request carries no usable locale.
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    /// Build a locale from raw subtags. Empty region/variant are dropped.
    pub fn new(language: &str, region: Option<&str>, variant: Option<&str>) -> Self {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Self {
            language: language.trim().to_ascii_lowercase(),
            region: region.and_then(non_empty).map(|r| r.to_ascii_uppercase()),
            variant: variant.and_then(non_empty),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: Self::DEFAULT_LANGUAGE.to_string(),
            region: None,
            variant: None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "-{variant}")?;
        }
        Ok(())
    }
}
