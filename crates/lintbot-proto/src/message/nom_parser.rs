//! Nom-based line splitter.
//!
//! Produces borrowed slices for tags, prefix, command and parameters; the
//! owned [`super::Message`] is built from those in `parse.rs`.

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

/// RFC 2812 caps a message at 15 parameters.
const MAX_PARAMS: usize = 15;

fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// `command = 1*letter / 3digit`
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Split parameters, collapsing repeated spaces. A `:`-prefixed parameter
/// swallows the rest of the line.
fn parse_params(input: &str) -> (&str, SmallVec<[&str; MAX_PARAMS]>) {
    let mut params: SmallVec<[&str; MAX_PARAMS]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') && params.len() < MAX_PARAMS {
        rest = rest.trim_start_matches(' ');

        if rest.is_empty() || rest.starts_with(['\r', '\n']) {
            break;
        }

        if let Some(after_colon) = rest.strip_prefix(':') {
            let end = after_colon.find(['\r', '\n']).unwrap_or(after_colon.len());
            params.push(&after_colon[..end]);
            rest = &after_colon[end..];
            break;
        }

        let end = rest.find([' ', '\r', '\n']).unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    (rest, params)
}

fn parse_message(input: &str) -> IResult<&str, ParsedMessage<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let (rest, params) = parse_params(input);

    Ok((
        rest,
        ParsedMessage {
            tags,
            prefix,
            command,
            params,
        },
    ))
}

/// A message split into borrowed parts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedMessage<'a> {
    pub tags: Option<&'a str>,
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; MAX_PARAMS]>,
}

impl<'a> ParsedMessage<'a> {
    pub fn parse(input: &'a str) -> Result<Self, DetailedParseError> {
        match parse_message(input) {
            Ok((_remaining, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(DetailedParseError {
                position: input.len() - e.input.len(),
                kind: e.code,
            }),
            Err(nom::Err::Incomplete(_)) => Err(DetailedParseError {
                position: input.len(),
                kind: ErrorKind::Eof,
            }),
        }
    }
}

/// Where and why the splitter gave up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DetailedParseError {
    pub position: usize,
    pub kind: ErrorKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let msg = ParsedMessage::parse("PING").unwrap();
        assert_eq!(msg.command, "PING");
        assert!(msg.tags.is_none());
        assert!(msg.prefix.is_none());
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_privmsg_with_prefix() {
        let msg =
            ParsedMessage::parse(":alice!a@host PRIVMSG #python :lintbot: https://dpaste.de/x")
                .unwrap();
        assert_eq!(msg.prefix, Some("alice!a@host"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(
            msg.params.as_slice(),
            &["#python", "lintbot: https://dpaste.de/x"]
        );
    }

    #[test]
    fn test_parse_with_tags() {
        let msg = ParsedMessage::parse("@time=2023-01-01T00:00:00Z :nick PRIVMSG #ch :Hi").unwrap();
        assert_eq!(msg.tags, Some("time=2023-01-01T00:00:00Z"));
        assert_eq!(msg.prefix, Some("nick"));
        assert_eq!(msg.params.as_slice(), &["#ch", "Hi"]);
    }

    #[test]
    fn test_parse_with_crlf_and_repeated_spaces() {
        let msg = ParsedMessage::parse("JOIN   #a    key\r\n").unwrap();
        assert_eq!(msg.params.as_slice(), &["#a", "key"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        let msg = ParsedMessage::parse("PRIVMSG #channel :").unwrap();
        assert_eq!(msg.params.as_slice(), &["#channel", ""]);
    }

    #[test]
    fn test_parse_command_validation() {
        assert!(ParsedMessage::parse("PING").is_ok());
        assert!(ParsedMessage::parse("001").is_ok());
        assert!(ParsedMessage::parse("PING123").is_err());
        assert!(ParsedMessage::parse("12").is_err());
        assert!(ParsedMessage::parse("").is_err());
    }

    #[test]
    fn test_parse_params_limit() {
        let raw = "CMD p1 p2 p3 p4 p5 p6 p7 p8 p9 p10 p11 p12 p13 p14 p15 p16";
        let msg = ParsedMessage::parse(raw).unwrap();
        assert_eq!(msg.params.len(), 15);
        assert_eq!(msg.params[14], "p15");
    }
}
