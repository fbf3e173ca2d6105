//! Network driver: owns the socket and reconnects.

use std::future::Future;
use std::io;
use std::pin::Pin;

use lintbot_proto::{Message, Transport};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, info, warn, Instrument};

use super::{tls, Backoff, Dispatcher, Outbox, Session, SessionAction, SessionState};
use crate::config::Config;
use crate::error::SessionError;
use crate::pipeline::Pipeline;
use crate::router::CommandRouter;
use crate::telemetry::spans;

/// Replies waiting for the socket. Survives reconnects.
const OUTBOUND_QUEUE: usize = 256;

/// The running bot: one connection at a time, one writer.
pub struct Bot {
    config: Config,
    channel: String,
    router: CommandRouter,
    dispatcher: Dispatcher,
    outbox: Outbox,
    backoff: Backoff,
}

impl Bot {
    pub fn new(
        config: Config,
        channel: impl Into<String>,
        pipeline: Pipeline,
    ) -> Result<Self, regex::Error> {
        let router = CommandRouter::new(
            config.irc.nickname.clone(),
            &config.router.paste_pattern,
            config.router.service_name.clone(),
        )?;
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
        let backoff = Backoff::from_config(&config.reconnect);

        Ok(Self {
            config,
            channel: channel.into(),
            router,
            dispatcher: Dispatcher::new(pipeline, tx),
            outbox: Outbox::new(rx),
            backoff,
        })
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> Result<(), SessionError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` completes, then send QUIT.
    ///
    /// Only the first connection attempt can fail this call; afterwards
    /// every drop or failed reconnect is retried with backoff.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), SessionError>
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut transport = self.connect().await?;

        loop {
            let span = spans::connection(&self.config.irc.server, self.backoff.attempts());
            match self.drive(transport, &mut shutdown).instrument(span).await {
                Ok(()) => return Ok(()),
                Err(e) => warn!(error = %e, "connection lost"),
            }

            transport = loop {
                let delay = self.backoff.next_delay();
                info!(
                    delay_ms = delay.as_millis() as u64,
                    attempt = self.backoff.attempts(),
                    "reconnecting"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = &mut shutdown => return Ok(()),
                }

                match self.connect().await {
                    Ok(transport) => break transport,
                    Err(e) => warn!(error = %e, "reconnect failed"),
                }
            };
        }
    }

    async fn connect(&self) -> Result<Transport, SessionError> {
        let irc = &self.config.irc;
        let address = irc.address();

        let stream =
            match tokio::time::timeout(irc.registration_timeout(), TcpStream::connect(&address))
                .await
            {
                Ok(Ok(stream)) => stream,
                Ok(Err(source)) => return Err(SessionError::Connect { address, source }),
                Err(_) => {
                    return Err(SessionError::Connect {
                        address,
                        source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
                    });
                }
            };
        let transport = if irc.tls {
            Transport::client_tls(tls::connect(stream, &irc.server).await?)
        } else {
            Transport::tcp(stream)
        };
        info!(address = %address, tls = transport.is_tls(), "connected");
        Ok(transport)
    }

    /// Drive one connection. `Ok` means shutdown was requested.
    async fn drive<F>(
        &mut self,
        mut transport: Transport,
        shutdown: &mut Pin<&mut F>,
    ) -> Result<(), SessionError>
    where
        F: Future<Output = ()>,
    {
        let irc = self.config.irc.clone();
        let mut session = Session::new(&irc, self.channel.clone(), self.router.clone());
        for message in session.start() {
            transport.write_message(&message).await?;
        }

        let registration_deadline = Instant::now() + irc.registration_timeout();
        let ping_interval = irc.ping_interval();
        let keepalive = tokio::time::sleep(ping_interval);
        tokio::pin!(keepalive);
        let mut awaiting_pong = false;

        loop {
            let joined = session.state() == SessionState::Joined;

            tokio::select! {
                read = transport.read_message() => {
                    let message = read?.ok_or(SessionError::Eof)?;
                    keepalive.as_mut().reset(Instant::now() + ping_interval);
                    awaiting_pong = false;

                    for action in session.handle(&message) {
                        match action {
                            SessionAction::Send(reply) => transport.write_message(&reply).await?,
                            SessionAction::Lint(request) => {
                                info!(user = %request.requester, url = %request.url, "lint requested");
                                self.dispatcher.dispatch(request);
                            }
                            SessionAction::Disconnect(reason) => {
                                return Err(SessionError::Closed(reason));
                            }
                        }
                    }

                    if !joined && session.state() == SessionState::Joined {
                        self.backoff.reset();
                    }
                }
                Some(reply) = self.outbox.next(), if joined => {
                    if let Err(e) = transport.write_message(&reply).await {
                        self.outbox.requeue(reply);
                        return Err(e.into());
                    }
                }
                _ = &mut keepalive => {
                    if awaiting_pong {
                        return Err(SessionError::PingTimeout);
                    }
                    transport.write_message(&Message::ping(irc.server.clone())).await?;
                    awaiting_pong = true;
                    keepalive.as_mut().reset(Instant::now() + ping_interval);
                }
                _ = tokio::time::sleep_until(registration_deadline), if !joined => {
                    return Err(SessionError::RegistrationTimeout(irc.registration_timeout_secs));
                }
                _ = &mut *shutdown => {
                    info!("shutting down");
                    session.mark_disconnected();
                    let quit = Message::quit(Some(irc.quit_message.clone()));
                    if let Err(e) = transport.write_message(&quit).await {
                        warn!(error = %e, "failed to send QUIT");
                    }
                    return Ok(());
                }
            }
        }
    }
}
