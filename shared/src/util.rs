/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC time as an RFC 3339 string (backend `created_at` format)
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Shorten user-facing text to `max` characters, appending `...` when cut.
///
/// Counts Unicode scalar values, not bytes.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("P001", 20), "P001");
        assert_eq!(ellipsize("abcdef", 3), "abc...");
        assert_eq!(ellipsize("ação", 4), "ação");
        assert_eq!(ellipsize("açãoé", 4), "ação...");
    }

    #[test]
    fn test_now_millis_is_positive() {
        assert!(now_millis() > 1_704_067_200_000);
    }
}
