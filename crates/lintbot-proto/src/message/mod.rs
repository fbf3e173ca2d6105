//! Owned IRC messages: model, parser and serializer.

mod nom_parser;
mod parse;
mod serialize;
mod types;

pub use self::types::Message;
