pub const SESSIONS: [(&str, &str); 15] = [
    ("Friday October 17th at 9:20", "202510170920"),
    ("Friday October 17th at 11:00", "202510171100"),
    ("Friday October 17th at 12:40", "202510171240"),
    ("Friday October 17th at 14:20", "202510171420"),
    ("Friday October 17th at 16:00", "202510171600"),
    ("Saturday October 18th at 9:20", "202510180920"),
    ("Saturday October 18th at 11:00", "202510181100"),
    ("Saturday October 18th at 12:40", "202510181240"),
    ("Saturday October 18th at 14:20", "202510181420"),
    ("Saturday October 18th at 16:00", "202510181600"),
    ("Friday October 24th at 9:20", "202510240920"),
    ("Friday October 24th at 11:00", "202510241100"),
    ("Friday October 24th at 12:40", "202510241240"),
    ("Friday October 24th at 14:20", "202510241420"),
    ("Friday October 24th at 16:00", "202510241600"),
];

pub fn display_for(code: &str) -> Option<&'static str> {
    SESSIONS
        .iter()
        .find(|(_, session_code)| *session_code == code)
        .map(|(display, _)| *display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_for_known_code() {
        assert_eq!(display_for("202510181240"), Some("Saturday October 18th at 12:40"));
    }

    #[test]
    fn test_display_for_unknown_code() {
        assert_eq!(display_for(""), None);
        assert_eq!(display_for("202510181241"), None);
    }

    #[test]
    fn test_codes_are_unique_timestamps() {
        for (index, (_, code)) in SESSIONS.iter().enumerate() {
            assert_eq!(code.len(), 12);
            assert!(code.chars().all(|ch| ch.is_ascii_digit()));
            assert!(SESSIONS[index + 1..].iter().all(|(_, other)| other != code));
        }
    }
}
