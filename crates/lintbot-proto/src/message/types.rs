use crate::chan::ChannelExt;
use crate::command::Command;
use crate::error::MessageParseError;
use crate::prefix::Prefix;

/// An owned IRC message.
///
/// Message tags are accepted on input but not retained; the bot has no use
/// for them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message source (`nick!user@host` or a server name).
    pub prefix: Option<Prefix>,
    /// The command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a message from raw components.
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        let prefix = prefix.map(Prefix::try_from_str).transpose()?;
        Ok(Message {
            prefix,
            command: Command::new(command, args)?,
        })
    }

    /// Nickname from the prefix, when the source is a user.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }

    /// Where a reply to this message should go: the channel for channel
    /// traffic, otherwise the sender.
    pub fn response_target(&self) -> Option<&str> {
        match &self.command {
            Command::PRIVMSG(target, _) | Command::NOTICE(target, _)
                if target.is_channel_name() =>
            {
                Some(target.as_str())
            }
            _ => self.source_nickname(),
        }
    }

    /// `PRIVMSG target :text`
    #[must_use]
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::PRIVMSG(target.into(), text.into()).into()
    }

    /// `NOTICE target :text`
    #[must_use]
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::NOTICE(target.into(), text.into()).into()
    }

    /// `JOIN channel`
    #[must_use]
    pub fn join(channel: impl Into<String>) -> Self {
        Command::JOIN(channel.into(), None, None).into()
    }

    /// `NICK nickname`
    #[must_use]
    pub fn nick(nickname: impl Into<String>) -> Self {
        Command::NICK(nickname.into()).into()
    }

    /// `USER username 0 * :realname`
    #[must_use]
    pub fn user(username: impl Into<String>, realname: impl Into<String>) -> Self {
        Command::USER(username.into(), "0".into(), realname.into()).into()
    }

    /// `PING token`
    #[must_use]
    pub fn ping(token: impl Into<String>) -> Self {
        Command::PING(token.into(), None).into()
    }

    /// `PONG token`
    #[must_use]
    pub fn pong(token: impl Into<String>) -> Self {
        Command::PONG(token.into(), None).into()
    }

    /// `QUIT [:reason]`
    #[must_use]
    pub fn quit(reason: Option<String>) -> Self {
        Command::QUIT(reason).into()
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Message {
        Message {
            prefix: None,
            command,
        }
    }
}
