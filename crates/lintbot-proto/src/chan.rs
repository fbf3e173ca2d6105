//! Channel name helpers.

/// Extension trait for recognising channel names.
pub trait ChannelExt {
    /// Whether this string names a channel (`#`, `&`, `+` or `!` prefix).
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        self.len() > 1
            && self.starts_with(['#', '&', '+', '!'])
            && !self.contains([' ', ',', '\x07', '\r', '\n', '\0'])
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelExt;

    #[test]
    fn test_channel_names() {
        assert!("#python".is_channel_name());
        assert!("&local".is_channel_name());
        assert!(!"#".is_channel_name());
        assert!(!"lintbot".is_channel_name());
        assert!(!"#two words".is_channel_name());
        assert!(!"#a,#b".is_channel_name());
    }
}
