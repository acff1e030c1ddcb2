//! Environment variable helpers shared by the front ends.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set or empty: returns `default` (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns
///   `default` instead of silently swallowing the failure.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    let raw = std::env::var(var).ok();
    parse_with_default(var, raw.as_deref(), default)
}

fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        Some(v) if !v.is_empty() => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        _ => default,
    }
}

/// Read an environment variable, treating empty or whitespace-only values
/// as absent.
pub fn env_nonempty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
