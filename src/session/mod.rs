//! IRC session lifecycle.
//!
//! [`Session`] is the sans-IO core: it consumes parsed messages and returns
//! [`SessionAction`]s. [`Bot`] owns the socket, performs those actions, and
//! reconnects with [`Backoff`].

use lintbot_proto::{irc_eq, Command, Message, Response};
use tracing::{debug, info, warn};

use crate::config::IrcConfig;
use crate::router::{CommandRouter, Intent, LintRequest};

pub mod backoff;
pub mod bot;
pub mod dispatch;
mod tls;

pub use backoff::Backoff;
pub use bot::Bot;
pub use dispatch::{Dispatcher, Outbox};

/// Reply to anything sent to the bot directly.
pub const PRIVATE_REPLY: &str = "public channel only buddy!";

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    /// Registration sent, waiting for `001`.
    Connecting,
    /// Registered, waiting for our own JOIN echo.
    Connected,
    /// In the channel; PRIVMSGs are handled.
    Joined,
}

/// Something the driver must do on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Send(Message),
    Lint(LintRequest),
    Disconnect(String),
}

/// State for one connection attempt.
#[derive(Debug)]
pub struct Session {
    nickname: String,
    username: String,
    realname: String,
    password: Option<String>,
    channel: String,
    state: SessionState,
    router: CommandRouter,
}

impl Session {
    pub fn new(irc: &IrcConfig, channel: impl Into<String>, router: CommandRouter) -> Self {
        Self {
            nickname: irc.nickname.clone(),
            username: irc.username.clone(),
            realname: irc.realname.clone(),
            password: irc.password.clone(),
            channel: channel.into(),
            state: SessionState::Disconnected,
            router,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Registration burst for a fresh connection.
    pub fn start(&mut self) -> Vec<Message> {
        self.state = SessionState::Connecting;

        let mut burst = Vec::with_capacity(3);
        if let Some(password) = &self.password {
            burst.push(Command::PASS(password.clone()).into());
        }
        burst.push(Message::nick(self.nickname.clone()));
        burst.push(Message::user(self.username.clone(), self.realname.clone()));
        burst
    }

    pub fn mark_disconnected(&mut self) {
        self.state = SessionState::Disconnected;
    }

    /// Advance the session with one inbound message.
    pub fn handle(&mut self, message: &Message) -> Vec<SessionAction> {
        match &message.command {
            Command::PING(token, _) => {
                vec![SessionAction::Send(Message::pong(token.clone()))]
            }
            Command::ERROR(reason) => {
                self.state = SessionState::Disconnected;
                vec![SessionAction::Disconnect(format!("server error: {reason}"))]
            }
            Command::Response(response, args) => self.handle_numeric(*response, args),
            Command::JOIN(channel, _, _) => {
                let ours = message
                    .source_nickname()
                    .is_some_and(|nick| irc_eq(nick, &self.nickname));
                if ours && irc_eq(channel, &self.channel) && self.state == SessionState::Connected {
                    info!(channel = %self.channel, "joined channel");
                    self.state = SessionState::Joined;
                }
                Vec::new()
            }
            Command::PRIVMSG(target, text) if self.state == SessionState::Joined => {
                self.handle_privmsg(message, target, text)
            }
            _ => Vec::new(),
        }
    }

    fn handle_numeric(&mut self, response: Response, args: &[String]) -> Vec<SessionAction> {
        match (self.state, response) {
            (SessionState::Connecting, Response::RPL_WELCOME) => {
                info!(nick = %self.nickname, "registered");
                self.state = SessionState::Connected;
                vec![SessionAction::Send(Message::join(self.channel.clone()))]
            }
            (
                SessionState::Connecting,
                Response::ERR_NICKNAMEINUSE | Response::ERR_ERRONEUSNICKNAME,
            ) => {
                self.state = SessionState::Disconnected;
                vec![SessionAction::Disconnect(format!(
                    "nickname {} rejected ({})",
                    self.nickname, response
                ))]
            }
            (SessionState::Connected, r) if r.is_join_rejection() => {
                let reason = args.last().map(String::as_str).unwrap_or("no reason");
                warn!(channel = %self.channel, code = %r, reason, "join rejected");
                self.state = SessionState::Disconnected;
                vec![SessionAction::Disconnect(format!(
                    "cannot join {}: {}",
                    self.channel, reason
                ))]
            }
            _ => Vec::new(),
        }
    }

    fn handle_privmsg(&self, message: &Message, target: &str, text: &str) -> Vec<SessionAction> {
        let Some(sender) = message.source_nickname() else {
            return Vec::new();
        };

        if irc_eq(target, &self.nickname) {
            debug!(user = %sender, "private message refused");
            return vec![SessionAction::Send(Message::privmsg(sender, PRIVATE_REPLY))];
        }
        if !irc_eq(target, &self.channel) {
            return Vec::new();
        }

        match self.router.classify(sender, text) {
            Intent::Help => vec![SessionAction::Send(Message::privmsg(
                self.channel.clone(),
                self.router.help_text(),
            ))],
            Intent::ServiceInfo | Intent::NoUrl => vec![SessionAction::Send(Message::privmsg(
                self.channel.clone(),
                self.router.service_text(),
            ))],
            Intent::LintRequest(request) => vec![SessionAction::Lint(request)],
            Intent::Ignore => Vec::new(),
        }
    }
}
