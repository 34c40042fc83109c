//! Hospital context resolution.
//!
//! The hospital a request acts on can arrive through four channels. They
//! are tried in the order of [`HospitalSource::PRECEDENCE`]; the first
//! channel that yields an id wins and the rest are never consulted.

use serde_json::Value;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_service::context::missing_hospital_context;

/// Where a resolved hospital id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HospitalSource {
    QueryParameter,
    Header,
    TokenClaim,
    StaffAssignment,
}

impl HospitalSource {
    /// Lookup order, highest precedence first.
    pub const PRECEDENCE: [HospitalSource; 4] = [
        Self::QueryParameter,
        Self::Header,
        Self::TokenClaim,
        Self::StaffAssignment,
    ];

    /// Whether the caller chose the hospital explicitly on this request.
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::QueryParameter | Self::Header)
    }

    fn lookup(&self, inputs: &HospitalInputs<'_>) -> AppResult<Option<Uuid>> {
        match self {
            Self::QueryParameter => parse_explicit(inputs.query, "hospitalId query parameter"),
            Self::Header => parse_explicit(inputs.header, "X-Hospital-Id header"),
            Self::TokenClaim => Ok(inputs.claim.and_then(claim_hospital)),
            Self::StaffAssignment => Ok(inputs.assignments.first().copied()),
        }
    }
}

/// Raw channel values for one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct HospitalInputs<'a> {
    pub query: Option<&'a str>,
    pub header: Option<&'a str>,
    pub claim: Option<&'a Value>,
    /// Staff assignments, primary first.
    pub assignments: &'a [Uuid],
}

/// Resolve the hospital and report which channel supplied it.
///
/// Blank query or header values count as absent; a non-blank value that is
/// not a UUID is rejected rather than skipped. Claim values that cannot be
/// parsed are skipped.
pub fn resolve_hospital(inputs: &HospitalInputs<'_>) -> AppResult<(Uuid, HospitalSource)> {
    for source in HospitalSource::PRECEDENCE {
        if let Some(id) = source.lookup(inputs)? {
            return Ok((id, source));
        }
    }
    Err(missing_hospital_context())
}

fn parse_explicit(raw: Option<&str>, channel: &str) -> AppResult<Option<Uuid>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => Uuid::parse_str(v)
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid {channel}: '{v}'"))),
    }
}

/// Accepts a string, `{ "id": .. }`, `{ "value": .. }` or an array whose
/// first parseable element wins.
fn claim_hospital(value: &Value) -> Option<Uuid> {
    match value {
        Value::String(s) => Uuid::parse_str(s.trim()).ok(),
        Value::Object(map) => ["id", "value"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(claim_hospital),
        Value::Array(items) => items.iter().find_map(claim_hospital),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_single_channel_wins() {
        let id = Uuid::new_v4();
        let raw = id.to_string();
        let claim = json!(raw);
        let assignments = [id];

        let cases = [
            HospitalInputs {
                query: Some(&raw),
                ..Default::default()
            },
            HospitalInputs {
                header: Some(&raw),
                ..Default::default()
            },
            HospitalInputs {
                claim: Some(&claim),
                ..Default::default()
            },
            HospitalInputs {
                assignments: &assignments,
                ..Default::default()
            },
        ];
        for (inputs, expected) in cases.iter().zip(HospitalSource::PRECEDENCE) {
            assert_eq!(resolve_hospital(inputs).unwrap(), (id, expected));
        }
    }

    #[test]
    fn test_precedence_query_header_claim_assignment() {
        let (q, h, c, a) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let (q_raw, h_raw) = (q.to_string(), h.to_string());
        let claim = json!(c.to_string());
        let assignments = [a];
        let mut inputs = HospitalInputs {
            query: Some(&q_raw),
            header: Some(&h_raw),
            claim: Some(&claim),
            assignments: &assignments,
        };

        assert_eq!(resolve_hospital(&inputs).unwrap().0, q);
        inputs.query = Some("  ");
        assert_eq!(resolve_hospital(&inputs).unwrap().0, h);
        inputs.header = None;
        assert_eq!(resolve_hospital(&inputs).unwrap().0, c);
        inputs.claim = None;
        assert_eq!(resolve_hospital(&inputs).unwrap().0, a);
    }

    #[test]
    fn test_structured_claims() {
        let id = Uuid::new_v4();
        for claim in [
            json!({ "id": id.to_string() }),
            json!({ "value": id.to_string() }),
            json!(["not-a-uuid", 42, id.to_string()]),
            json!([{ "id": id.to_string() }]),
        ] {
            let inputs = HospitalInputs {
                claim: Some(&claim),
                ..Default::default()
            };
            assert_eq!(resolve_hospital(&inputs).unwrap(), (id, HospitalSource::TokenClaim));
        }
    }

    #[test]
    fn test_unparseable_claim_falls_through() {
        let fallback = Uuid::new_v4();
        let claim = json!({ "name": "north" });
        let assignments = [fallback];
        let inputs = HospitalInputs {
            claim: Some(&claim),
            assignments: &assignments,
            ..Default::default()
        };
        assert_eq!(resolve_hospital(&inputs).unwrap().0, fallback);
    }

    #[test]
    fn test_nothing_resolves() {
        let err = resolve_hospital(&HospitalInputs::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(err.message.contains("X-Hospital-Id"));
    }

    #[test]
    fn test_malformed_explicit_value_is_rejected() {
        let inputs = HospitalInputs {
            header: Some("north-wing"),
            ..Default::default()
        };
        let err = resolve_hospital(&inputs).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
