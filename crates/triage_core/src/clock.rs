use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Current time as a canonical RFC3339 UTC string.
///
/// All timestamps in the domain model are RFC3339 UTC strings; this is the
/// only place they are minted.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Current unix time in seconds, used as the coarse component of incident IDs.
pub fn unix_seconds() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Parse a canonical timestamp back into an `OffsetDateTime`.
pub fn parse_rfc3339(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}
