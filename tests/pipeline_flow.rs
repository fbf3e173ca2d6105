//! End-to-end pipeline tests with in-process fetch, lint and publish stages.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockFetcher, MockLinter, MockSink};
use lintbot::pipeline::{Pipeline, StageOutcome, StagingStore};
use lintbot::session::Dispatcher;
use lintbot::LintRequest;
use lintbot_proto::{Command, Message};
use tokio::sync::mpsc;

fn pipeline(
    fetcher: &MockFetcher,
    linter: &MockLinter,
    sink: &MockSink,
    staging: &std::path::Path,
) -> Pipeline {
    Pipeline::new(
        Arc::new(fetcher.clone()),
        StagingStore::new(staging, 7, ".py"),
        Arc::new(linter.clone()),
        Arc::new(sink.clone()),
        "I only support dpaste.de",
    )
}

fn request(nick: &str, url: &str) -> LintRequest {
    LintRequest {
        requester: nick.into(),
        url: url.into(),
    }
}

fn privmsg(msg: &Message) -> (&str, &str) {
    match &msg.command {
        Command::PRIVMSG(target, text) => (target.as_str(), text.as_str()),
        other => panic!("expected PRIVMSG, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_published_to_requester() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("pastes");
    let fetcher = MockFetcher::new("import os\n");
    let linter = MockLinter::default();
    let sink = MockSink::default();
    let pipeline = pipeline(&fetcher, &linter, &sink, &staging);

    let reply = pipeline
        .respond(&request("lintbot-user", "https://dpaste.de/xYz9"))
        .await;

    assert_eq!(privmsg(&reply), ("lintbot-user", "http://ix.io/ref1"));
    assert_eq!(fetcher.calls(), vec!["https://dpaste.de/xYz9".to_string()]);

    let staged = linter.calls();
    assert_eq!(staged.len(), 1);
    let staged = &staged[0];
    assert_eq!(staged.outcome, StageOutcome::Created);
    assert_eq!(staged.name.len(), 10);
    assert!(staged.name.ends_with(".py"));
    let stem = &staged.name[..7];
    assert!(stem.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    assert_eq!(staged.path, staging.join(&staged.name));
    assert_eq!(std::fs::read_to_string(&staged.path).unwrap(), "import os\n");

    // The sink gets exactly what the linter produced.
    assert_eq!(
        sink.calls(),
        vec![format!("lint of {}:\nimport os\n", staged.name)]
    );
}

#[tokio::test]
async fn test_fetch_failure_sends_service_notice() {
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("pastes");
    let fetcher = MockFetcher::new("unused");
    let linter = MockLinter::default();
    let sink = MockSink::default();
    let pipeline = pipeline(&fetcher, &linter, &sink, &staging);

    let reply = pipeline
        .respond(&request("alice", "https://dpaste.de/missing"))
        .await;

    assert_eq!(privmsg(&reply), ("alice", "I only support dpaste.de"));
    assert!(linter.calls().is_empty());
    assert!(sink.calls().is_empty());
    assert!(!staging.exists(), "nothing staged for a failed fetch");
}

#[tokio::test]
async fn test_lint_failure_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new("x = 1\n");
    let linter = MockLinter {
        fail: true,
        ..MockLinter::default()
    };
    let sink = MockSink::default();
    let pipeline = pipeline(&fetcher, &linter, &sink, tmp.path());

    let reply = pipeline
        .respond(&request("alice", "https://dpaste.de/abc"))
        .await;

    assert_eq!(
        privmsg(&reply),
        ("alice", "sorry, linting that paste failed (lint)")
    );
    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn test_publish_failure_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::new("x = 1\n");
    let linter = MockLinter::default();
    let sink = MockSink {
        fail: true,
        ..MockSink::default()
    };
    let pipeline = pipeline(&fetcher, &linter, &sink, tmp.path());

    let reply = pipeline
        .respond(&request("alice", "https://dpaste.de/abc"))
        .await;

    assert_eq!(
        privmsg(&reply),
        ("alice", "sorry, linting that paste failed (publish)")
    );
}

#[tokio::test]
async fn test_replies_keep_per_user_order() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher {
        slow_delay: Duration::from_millis(300),
        ..MockFetcher::new("x = 1\n")
    };
    let linter = MockLinter::default();
    let sink = MockSink::default();
    let (tx, mut rx) = mpsc::channel(16);
    let mut dispatcher = Dispatcher::new(pipeline(&fetcher, &linter, &sink, tmp.path()), tx);

    let first = dispatcher.dispatch(request("alice", "https://dpaste.de/slow"));
    let second = dispatcher.dispatch(request("ALICE", "https://dpaste.de/fast"));
    let other = dispatcher.dispatch(request("bob", "https://dpaste.de/fast2"));
    for handle in [first, second, other] {
        handle.await.unwrap();
    }

    let mut replies = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        let (target, _) = privmsg(&msg);
        replies.push(target.to_owned());
    }

    // bob is not held up by alice; ALICE waits for alice's slow request.
    let alice = replies.iter().position(|t| t == "alice").unwrap();
    let alice_again = replies.iter().position(|t| t == "ALICE").unwrap();
    let bob = replies.iter().position(|t| t == "bob").unwrap();
    assert!(alice < alice_again);
    assert_eq!(bob, 0);
    assert_eq!(dispatcher.in_flight(), 0);
}
