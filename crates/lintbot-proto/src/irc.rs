//! IRC message codec for tokio.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error::{self, ProtocolError};
use crate::line::{is_illegal_control_char, LineCodec};
use crate::message::Message;

/// Tokio codec that frames lines with [`LineCodec`] and parses them into
/// [`Message`]s.
///
/// Blank lines are skipped. Lines that frame correctly but do not parse are
/// logged and skipped too, so a single odd line from the server does not end
/// the stream.
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Prepare an outgoing line.
    ///
    /// Truncates after the first line ending and rejects illegal control
    /// characters so user-supplied text cannot inject extra commands.
    pub fn sanitize(mut data: String) -> error::Result<String> {
        if let Some((pos, len)) = ["\r\n", "\r", "\n"]
            .iter()
            .flat_map(|needle| data.find(needle).map(|pos| (pos, needle.len())))
            .min_by_key(|&(pos, _)| pos)
        {
            data.truncate(pos + len);
        }

        if let Some(ch) = data.chars().find(|&ch| is_illegal_control_char(ch)) {
            return Err(ProtocolError::IllegalControlChar(ch));
        }

        Ok(data)
    }
}

impl Default for IrcCodec {
    fn default() -> Self {
        Self {
            inner: LineCodec::with_max_len(crate::transport::MAX_IRC_LINE_LEN),
        }
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        while let Some(line) = self.inner.decode(src)? {
            if line.trim_end_matches(['\r', '\n']).is_empty() {
                continue;
            }
            match line.parse::<Message>() {
                Ok(msg) => return Ok(Some(msg)),
                Err(e) => warn!(error = %e, line = %line.trim_end(), "skipping unparseable line"),
            }
        }
        Ok(None)
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        let sanitized = Self::sanitize(msg.to_string())?;
        self.inner.encode(sanitized, dst)
    }
}
