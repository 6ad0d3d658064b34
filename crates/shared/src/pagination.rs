//! List limit utilities.

/// Default number of rows returned by list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 200;

/// Smallest limit a list request may ask for.
pub const MIN_LIST_LIMIT: i64 = 1;

/// Largest number of rows a single list request may return.
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Resolves a requested row limit, clamping it into
/// `[MIN_LIST_LIMIT, MAX_LIST_LIMIT]`. A missing value yields the default.
pub fn resolve_limit(requested: Option<i64>) -> i64 {
    requested
        .map(|limit| limit.clamp(MIN_LIST_LIMIT, MAX_LIST_LIMIT))
        .unwrap_or(DEFAULT_LIST_LIMIT)
}

/// Parses a raw query-string limit. Unparseable input counts as missing.
// Out-of-range values clamp to the nearest bound rather than reverting to 200.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    resolve_limit(raw.and_then(|s| s.trim().parse::<i64>().ok()))
}
