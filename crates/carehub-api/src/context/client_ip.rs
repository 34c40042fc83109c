//! Client address provenance.

/// Client IP for logs and audit records.
///
/// A non-blank `override_ip` wins, then the first `X-Forwarded-For` entry,
/// then `X-Real-IP`, then the transport address. Values are trimmed but not
/// validated as IP syntax.
pub fn resolve_client_ip(
    override_ip: Option<&str>,
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
    remote: &str,
) -> String {
    non_blank(override_ip)
        .or_else(|| non_blank(forwarded_for.and_then(|v| v.split(',').next())))
        .or_else(|| non_blank(real_ip))
        .unwrap_or(remote)
        .to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
