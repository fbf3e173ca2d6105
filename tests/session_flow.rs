//! The bot against a scripted IRC server.

mod common;

use std::sync::Arc;

use common::{test_config, FakeIrcServer, MockFetcher, MockLinter, MockSink};
use lintbot::pipeline::{Pipeline, StagingStore};
use lintbot::{Bot, Config, SessionError};
use lintbot_proto::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

fn mock_pipeline(config: &Config, sink: &MockSink) -> Pipeline {
    Pipeline::new(
        Arc::new(MockFetcher::new("import os\n")),
        StagingStore::from_config(&config.staging),
        Arc::new(MockLinter::default()),
        Arc::new(sink.clone()),
        "I only support dpaste.de",
    )
}

/// Start the bot; dropping or firing the sender shuts it down.
fn spawn_bot(
    config: Config,
    sink: &MockSink,
) -> (oneshot::Sender<()>, JoinHandle<Result<(), SessionError>>) {
    let pipeline = mock_pipeline(&config, sink);
    let bot = Bot::new(config, "#python", pipeline).unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(bot.run_until(async move {
        let _ = rx.await;
    }));
    (tx, handle)
}

#[tokio::test]
async fn test_full_conversation() {
    let tmp = tempfile::tempdir().unwrap();
    let server = FakeIrcServer::bind().await.unwrap();
    let config = test_config(server.port(), tmp.path());
    let sink = MockSink::default();
    let (shutdown, bot) = spawn_bot(config, &sink);

    let mut conn = server.accept().await.unwrap();
    conn.welcome("lintbot", "#python").await.unwrap();

    // Keepalive from the server.
    conn.send_raw("PING :irc.test").await.unwrap();
    let pong = conn.expect("PONG").await.unwrap();
    assert!(matches!(pong.command, Command::PONG(ref token, _) if token == "irc.test"));

    conn.send_raw(":alice!a@host PRIVMSG #python :%help")
        .await
        .unwrap();
    assert_eq!(
        conn.expect_privmsg().await.unwrap(),
        ("#python".to_string(), "lintbot: paste url".to_string())
    );

    conn.send_raw(":alice!a@host PRIVMSG #python :%service")
        .await
        .unwrap();
    assert_eq!(
        conn.expect_privmsg().await.unwrap(),
        ("#python".to_string(), "I only support dpaste.de".to_string())
    );

    conn.send_raw(":alice!a@host PRIVMSG #python :lintbot: https://dpaste.de/xYz9")
        .await
        .unwrap();
    assert_eq!(
        conn.expect_privmsg().await.unwrap(),
        ("alice".to_string(), "http://ix.io/ref1".to_string())
    );
    assert_eq!(sink.calls().len(), 1);

    conn.send_raw(":bob!b@host PRIVMSG lintbot :lintbot: https://dpaste.de/abc")
        .await
        .unwrap();
    assert_eq!(
        conn.expect_privmsg().await.unwrap(),
        ("bob".to_string(), "public channel only buddy!".to_string())
    );
    assert_eq!(sink.calls().len(), 1, "private requests are never linted");

    shutdown.send(()).unwrap();
    let quit = conn.expect("QUIT").await.unwrap();
    assert_eq!(
        quit.command,
        Command::QUIT(Some("lintbot shutting down".into()))
    );
    assert!(bot.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_reconnects_after_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    let server = FakeIrcServer::bind().await.unwrap();
    let config = test_config(server.port(), tmp.path());
    let sink = MockSink::default();
    let (shutdown, bot) = spawn_bot(config, &sink);

    let mut first = server.accept().await.unwrap();
    first.welcome("lintbot", "#python").await.unwrap();
    first.send_raw("ERROR :Closing Link: maintenance").await.unwrap();

    let mut second = server.accept().await.unwrap();
    second.welcome("lintbot", "#python").await.unwrap();

    second
        .send_raw(":alice!a@host PRIVMSG #python :%help")
        .await
        .unwrap();
    let (target, _) = second.expect_privmsg().await.unwrap();
    assert_eq!(target, "#python");

    shutdown.send(()).unwrap();
    second.expect("QUIT").await.unwrap();
    assert!(bot.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_nickname_in_use_triggers_reconnect() {
    let tmp = tempfile::tempdir().unwrap();
    let server = FakeIrcServer::bind().await.unwrap();
    let config = test_config(server.port(), tmp.path());
    let sink = MockSink::default();
    let (shutdown, bot) = spawn_bot(config, &sink);

    let mut first = server.accept().await.unwrap();
    first.expect("USER").await.unwrap();
    first
        .send_raw(":irc.test 433 * lintbot :Nickname is already in use")
        .await
        .unwrap();

    let mut second = server.accept().await.unwrap();
    second.expect("NICK").await.unwrap();

    shutdown.send(()).unwrap();
    assert!(bot.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_silent_server_is_pinged_then_dropped() {
    let tmp = tempfile::tempdir().unwrap();
    let server = FakeIrcServer::bind().await.unwrap();
    let mut config = test_config(server.port(), tmp.path());
    config.irc.ping_interval_secs = 1;
    let sink = MockSink::default();
    let (shutdown, bot) = spawn_bot(config, &sink);

    let mut first = server.accept().await.unwrap();
    first.welcome("lintbot", "#python").await.unwrap();

    let ping = first.expect("PING").await.unwrap();
    assert!(matches!(ping.command, Command::PING(ref token, _) if token == "127.0.0.1"));

    // No PONG: the next silent interval ends the connection.
    let mut second = server.accept().await.unwrap();
    second.expect("NICK").await.unwrap();

    shutdown.send(()).unwrap();
    assert!(bot.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_initial_connect_failure_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = test_config(port, tmp.path());
    let sink = MockSink::default();
    let (_shutdown, bot) = spawn_bot(config, &sink);

    let result = bot.await.unwrap();
    assert!(matches!(result, Err(SessionError::Connect { .. })));
}
