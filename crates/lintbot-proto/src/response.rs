//! Numeric replies the client cares about.

use std::fmt;

/// A three-digit server numeric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Response(u16);

impl Response {
    /// `001` registration complete.
    pub const RPL_WELCOME: Response = Response(1);
    /// `403` no such channel.
    pub const ERR_NOSUCHCHANNEL: Response = Response(403);
    /// `432` erroneous nickname.
    pub const ERR_ERRONEUSNICKNAME: Response = Response(432);
    /// `433` nickname already in use.
    pub const ERR_NICKNAMEINUSE: Response = Response(433);
    /// `471` channel is full.
    pub const ERR_CHANNELISFULL: Response = Response(471);
    /// `473` invite-only channel.
    pub const ERR_INVITEONLYCHAN: Response = Response(473);
    /// `474` banned from channel.
    pub const ERR_BANNEDFROMCHAN: Response = Response(474);
    /// `475` bad channel key.
    pub const ERR_BADCHANNELKEY: Response = Response(475);

    /// Wrap a raw numeric. Values above 999 are not representable on the wire.
    pub fn from_code(code: u16) -> Option<Self> {
        (code <= 999).then_some(Response(code))
    }

    /// The numeric value.
    pub fn code(&self) -> u16 {
        self.0
    }

    /// Whether this numeric rejects a JOIN attempt.
    pub fn is_join_rejection(&self) -> bool {
        matches!(
            *self,
            Self::ERR_NOSUCHCHANNEL
                | Self::ERR_CHANNELISFULL
                | Self::ERR_INVITEONLYCHAN
                | Self::ERR_BANNEDFROMCHAN
                | Self::ERR_BADCHANNELKEY
        )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}
