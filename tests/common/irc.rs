//! Scripted IRC server for driving the bot over a real socket.

use std::time::Duration;

use lintbot_proto::{Command, Message};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// Listener on an ephemeral local port.
pub struct FakeIrcServer {
    listener: TcpListener,
}

impl FakeIrcServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().map(|a| a.port()).unwrap_or(0)
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<ServerConn> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        Ok(ServerConn::new(stream))
    }
}

/// Server side of one bot connection.
pub struct ServerConn {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl ServerConn {
    fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        }
    }

    /// Send a raw IRC line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single message from the bot.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("bot closed the connection");
        }
        line.trim_end()
            .parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Read until a message with the given command name arrives.
    pub async fn expect(&mut self, command: &str) -> anyhow::Result<Message> {
        loop {
            let msg = self.recv().await?;
            if msg.command.name() == command {
                return Ok(msg);
            }
        }
    }

    /// Accept registration and confirm the JOIN for `channel`.
    pub async fn welcome(&mut self, nick: &str, channel: &str) -> anyhow::Result<()> {
        self.expect("NICK").await?;
        self.expect("USER").await?;
        self.send_raw(&format!(":irc.test 001 {nick} :Welcome to the test network"))
            .await?;

        let join = self.expect("JOIN").await?;
        match &join.command {
            Command::JOIN(chan, _, _) if chan == channel => {}
            other => anyhow::bail!("unexpected join: {:?}", other),
        }
        self.send_raw(&format!(":{nick}!bot@127.0.0.1 JOIN {channel}"))
            .await
    }

    /// Next PRIVMSG as `(target, text)`.
    pub async fn expect_privmsg(&mut self) -> anyhow::Result<(String, String)> {
        let msg = self.expect("PRIVMSG").await?;
        match msg.command {
            Command::PRIVMSG(target, text) => Ok((target, text)),
            other => anyhow::bail!("not a PRIVMSG: {:?}", other),
        }
    }
}
