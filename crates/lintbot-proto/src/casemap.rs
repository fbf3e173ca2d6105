//! RFC 1459 case mapping.
//!
//! Nicknames and channel names compare case-insensitively on IRC, with
//! `[]\~` folding onto `{}|^`.

/// Lowercase a single character under RFC 1459 rules.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => (c as u8 + 32) as char,
        _ => c,
    }
}

/// Lowercase a whole string under RFC 1459 rules.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Case-insensitive comparison of two nicknames or channel names.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .chars()
            .zip(b.chars())
            .all(|(ca, cb)| irc_lower_char(ca) == irc_lower_char(cb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_special_chars() {
        assert_eq!(irc_lower_char('['), '{');
        assert_eq!(irc_lower_char('~'), '^');
        assert_eq!(irc_lower_char('Q'), 'q');
        assert_eq!(irc_lower_char('#'), '#');
        assert_eq!(irc_to_lower("LintBot[1]"), "lintbot{1}");
    }

    #[test]
    fn test_irc_eq() {
        assert!(irc_eq("LINTBOT", "lintbot"));
        assert!(irc_eq("bot[away]", "BOT{AWAY}"));
        assert!(!irc_eq("lintbot", "lintbot_"));
        assert!(!irc_eq("lintbot", "lintbox"));
    }
}
