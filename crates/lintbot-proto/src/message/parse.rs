//! `FromStr` for [`Message`] on top of the nom splitter.

use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};

use super::nom_parser::ParsedMessage;
use super::types::Message;

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        };

        if s.trim_end_matches(['\r', '\n']).is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let parsed = ParsedMessage::parse(s).map_err(|e| {
            invalid(MessageParseError::ParseContext {
                position: e.position,
                context: format!("{:?}", e.kind),
            })
        })?;

        Message::new(parsed.prefix, parsed.command, parsed.params.to_vec()).map_err(invalid)
    }
}
