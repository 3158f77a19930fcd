//! Query-count parameter handling.

/// Effective element count for `queries`/`count` parameters: missing or
/// non-numeric input defaults to 1, then the value is clamped to [1, 500].
/// Malformed input is never surfaced as an error.
pub fn clamp_count(raw: Option<&str>) -> usize {
    let requested = raw
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1);
    requested.clamp(1, 500) as usize
}
