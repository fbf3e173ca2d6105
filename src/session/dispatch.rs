//! Runs lint requests as independent tasks while keeping each user's replies
//! in request order.

use std::collections::HashMap;
use std::sync::Arc;

use lintbot_proto::{irc_to_lower, Message};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{warn, Instrument};

use crate::pipeline::Pipeline;
use crate::router::LintRequest;
use crate::telemetry::spans;

/// Spawns one task per [`LintRequest`].
///
/// Pipelines run concurrently. Before sending its reply, a task waits for
/// the previous request from the same nickname to deliver.
#[derive(Debug)]
pub struct Dispatcher {
    pipeline: Arc<Pipeline>,
    outbound: mpsc::Sender<Message>,
    pending: HashMap<String, oneshot::Receiver<()>>,
}

impl Dispatcher {
    pub fn new(pipeline: Pipeline, outbound: mpsc::Sender<Message>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            outbound,
            pending: HashMap::new(),
        }
    }

    pub fn dispatch(&mut self, request: LintRequest) -> JoinHandle<()> {
        self.prune();

        let key = irc_to_lower(&request.requester);
        let (done_tx, done_rx) = oneshot::channel();
        let previous = self.pending.insert(key, done_rx);

        let pipeline = Arc::clone(&self.pipeline);
        let outbound = self.outbound.clone();
        let span = spans::lint_request(&request.requester, &request.url);

        tokio::spawn(
            async move {
                let reply = pipeline.respond(&request).await;

                if let Some(previous) = previous {
                    // Err means the earlier task is gone; nothing left to wait for.
                    let _ = previous.await;
                }
                if outbound.send(reply).await.is_err() {
                    warn!("outbound queue closed, reply dropped");
                }
                let _ = done_tx.send(());
            }
            .instrument(span),
        )
    }

    /// Number of users with a reply still outstanding.
    pub fn in_flight(&mut self) -> usize {
        self.prune();
        self.pending.len()
    }

    fn prune(&mut self) {
        self.pending.retain(|_, rx| {
            matches!(rx.try_recv(), Err(oneshot::error::TryRecvError::Empty))
        });
    }
}

/// Replies waiting for the socket. Outlives individual connections.
#[derive(Debug)]
pub struct Outbox {
    queue: mpsc::Receiver<Message>,
    retry: Option<Message>,
}

impl Outbox {
    pub fn new(queue: mpsc::Receiver<Message>) -> Self {
        Self { queue, retry: None }
    }

    /// Next reply to send. A requeued reply comes before anything queued.
    pub async fn next(&mut self) -> Option<Message> {
        if let Some(reply) = self.retry.take() {
            return Some(reply);
        }
        self.queue.recv().await
    }

    /// Put back a reply whose write failed; it is sent first next time.
    pub fn requeue(&mut self, reply: Message) {
        self.retry = Some(reply);
    }
}
