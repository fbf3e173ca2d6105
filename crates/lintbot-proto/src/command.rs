//! IRC commands used by a client bot.
//!
//! Commands the bot never interprets are kept as [`Command::Raw`] so that
//! every well-formed line still parses.

use std::fmt::{self, Write};

use crate::error::MessageParseError;
use crate::response::Response;

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER username mode realname`
    USER(String, String, String),
    /// `QUIT [message]`
    QUIT(Option<String>),
    /// `JOIN channels [keys] [realname]`
    JOIN(String, Option<String>, Option<String>),
    /// `PART channels [message]`
    PART(String, Option<String>),
    /// `PRIVMSG target text`
    PRIVMSG(String, String),
    /// `NOTICE target text`
    NOTICE(String, String),
    /// `PING server [server2]`
    PING(String, Option<String>),
    /// `PONG server [server2]`
    PONG(String, Option<String>),
    /// `ERROR message`
    ERROR(String),
    /// Numeric reply with its parameters.
    Response(Response, Vec<String>),
    /// Anything else, verbatim.
    Raw(String, Vec<String>),
}

fn require(command: &str, args: &[&str], expected: usize) -> Result<(), MessageParseError> {
    if args.len() < expected {
        return Err(MessageParseError::NotEnoughArguments {
            command: command.to_owned(),
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_owned()).collect()
}

impl Command {
    /// Build a command from its name and parameters.
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        if cmd.len() == 3 && cmd.bytes().all(|b| b.is_ascii_digit()) {
            let code: u16 = cmd.parse().map_err(|_| MessageParseError::ParseContext {
                position: 0,
                context: format!("bad numeric {}", cmd),
            })?;
            if let Some(resp) = Response::from_code(code) {
                return Ok(Command::Response(resp, owned(&args)));
            }
        }

        let arg = |i: usize| args[i].to_owned();
        let opt = |i: usize| args.get(i).map(|s| (*s).to_owned());

        let command = match cmd.to_ascii_uppercase().as_str() {
            "PASS" => {
                require(cmd, &args, 1)?;
                Command::PASS(arg(0))
            }
            "NICK" => {
                require(cmd, &args, 1)?;
                Command::NICK(arg(0))
            }
            "USER" => {
                require(cmd, &args, 4)?;
                Command::USER(arg(0), arg(1), arg(3))
            }
            "QUIT" => Command::QUIT(opt(0)),
            "JOIN" => {
                require(cmd, &args, 1)?;
                Command::JOIN(arg(0), opt(1), opt(2))
            }
            "PART" => {
                require(cmd, &args, 1)?;
                Command::PART(arg(0), opt(1))
            }
            "PRIVMSG" => {
                require(cmd, &args, 2)?;
                Command::PRIVMSG(arg(0), arg(1))
            }
            "NOTICE" => {
                require(cmd, &args, 2)?;
                Command::NOTICE(arg(0), arg(1))
            }
            "PING" => {
                require(cmd, &args, 1)?;
                Command::PING(arg(0), opt(1))
            }
            "PONG" => {
                require(cmd, &args, 1)?;
                Command::PONG(arg(0), opt(1))
            }
            "ERROR" => Command::ERROR(opt(0).unwrap_or_default()),
            _ => Command::Raw(cmd.to_owned(), owned(&args)),
        };
        Ok(command)
    }

    /// Wire name of this command.
    pub fn name(&self) -> String {
        match self {
            Command::PASS(_) => "PASS".into(),
            Command::NICK(_) => "NICK".into(),
            Command::USER(..) => "USER".into(),
            Command::QUIT(_) => "QUIT".into(),
            Command::JOIN(..) => "JOIN".into(),
            Command::PART(..) => "PART".into(),
            Command::PRIVMSG(..) => "PRIVMSG".into(),
            Command::NOTICE(..) => "NOTICE".into(),
            Command::PING(..) => "PING".into(),
            Command::PONG(..) => "PONG".into(),
            Command::ERROR(_) => "ERROR".into(),
            Command::Response(resp, _) => resp.to_string(),
            Command::Raw(name, _) => name.clone(),
        }
    }
}

/// Whether a final parameter must be sent as a trailing (`:`-prefixed) one.
pub fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Write `cmd` and its parameters, colon-prefixing the last only when needed.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    if let Some((last, middle)) = args.split_last() {
        for param in middle {
            f.write_char(' ')?;
            f.write_str(param)?;
        }
        f.write_char(' ')?;
        if needs_colon_prefix(last) {
            f.write_char(':')?;
        }
        f.write_str(last)?;
    }
    Ok(())
}

/// Write `cmd` and its parameters, always sending the last as trailing.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    if let Some((last, middle)) = args.split_last() {
        for param in middle {
            f.write_char(' ')?;
            f.write_str(param)?;
        }
        f.write_str(" :")?;
        f.write_str(last)?;
    }
    Ok(())
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(p) => write_cmd(f, "PASS", &[p]),
            Command::NICK(n) => write_cmd(f, "NICK", &[n]),
            Command::USER(u, m, r) => write_cmd_freeform(f, "USER", &[u, m, "*", r]),
            Command::QUIT(Some(m)) => write_cmd_freeform(f, "QUIT", &[m]),
            Command::QUIT(None) => write_cmd(f, "QUIT", &[]),
            Command::JOIN(c, Some(k), Some(n)) => write_cmd(f, "JOIN", &[c, k, n]),
            Command::JOIN(c, Some(k), None) => write_cmd(f, "JOIN", &[c, k]),
            Command::JOIN(c, None, Some(n)) => write_cmd(f, "JOIN", &[c, n]),
            Command::JOIN(c, None, None) => write_cmd(f, "JOIN", &[c]),
            Command::PART(c, Some(m)) => write_cmd_freeform(f, "PART", &[c, m]),
            Command::PART(c, None) => write_cmd(f, "PART", &[c]),
            Command::PRIVMSG(t, m) => write_cmd_freeform(f, "PRIVMSG", &[t, m]),
            Command::NOTICE(t, m) => write_cmd_freeform(f, "NOTICE", &[t, m]),
            Command::PING(s, Some(t)) => write_cmd(f, "PING", &[s, t]),
            Command::PING(s, None) => write_cmd(f, "PING", &[s]),
            Command::PONG(s, Some(t)) => write_cmd(f, "PONG", &[s, t]),
            Command::PONG(s, None) => write_cmd(f, "PONG", &[s]),
            Command::ERROR(m) => write_cmd_freeform(f, "ERROR", &[m]),
            Command::Response(resp, args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_cmd(f, &resp.to_string(), &args)
            }
            Command::Raw(name, args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_cmd(f, name, &args)
            }
        }
    }
}
