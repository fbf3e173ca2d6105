//! Classification of channel text into bot intents.
//!
//! [`classify`] is a pure function; [`CommandRouter`] holds the compiled
//! paste pattern and renders the fixed channel replies.

use regex::Regex;

/// A paste the bot was asked to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintRequest {
    /// Nickname that asked; the only recipient of the result.
    pub requester: String,
    /// Paste URL exactly as matched in the message.
    pub url: String,
}

/// What a channel message asks of the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `%help`
    Help,
    /// `%service`
    ServiceInfo,
    /// Addressed to the bot with a supported paste URL.
    LintRequest(LintRequest),
    /// Addressed to the bot without a supported paste URL.
    NoUrl,
    /// Anything else.
    Ignore,
}

/// Classify one channel message.
///
/// `%help` and `%service` must match the whole text. A request must start
/// with `<nickname>:` (case-sensitive); the first pattern match after the
/// colon is the URL.
pub fn classify(sender: &str, text: &str, nickname: &str, pattern: &Regex) -> Intent {
    match text {
        "%help" => return Intent::Help,
        "%service" => return Intent::ServiceInfo,
        _ => {}
    }

    let Some(rest) = text
        .strip_prefix(nickname)
        .and_then(|rest| rest.strip_prefix(':'))
    else {
        return Intent::Ignore;
    };

    match pattern.find(rest) {
        Some(m) => Intent::LintRequest(LintRequest {
            requester: sender.to_owned(),
            url: m.as_str().to_owned(),
        }),
        None => Intent::NoUrl,
    }
}

/// Router bound to one nickname, paste pattern and service name.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    nickname: String,
    pattern: Regex,
    service_name: String,
}

impl CommandRouter {
    pub fn new(
        nickname: impl Into<String>,
        paste_pattern: &str,
        service_name: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            nickname: nickname.into(),
            pattern: Regex::new(paste_pattern)?,
            service_name: service_name.into(),
        })
    }

    pub fn classify(&self, sender: &str, text: &str) -> Intent {
        classify(sender, text, &self.nickname, &self.pattern)
    }

    /// Channel reply to `%help`.
    pub fn help_text(&self) -> String {
        format!("{}: paste url", self.nickname)
    }

    /// Channel reply to `%service` and to requests without a usable URL.
    pub fn service_text(&self) -> String {
        format!("I only support {}", self.service_name)
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }
}
