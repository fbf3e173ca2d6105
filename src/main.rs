//! lintbot - IRC bot that lints pasted Python and links the report.

use std::process::ExitCode;

use lintbot::config::validation;
use lintbot::{Bot, Config, Pipeline};
use lintbot_proto::ChannelExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lintbot <channel>";

/// The single positional argument, if it is a channel name.
fn parse_channel(mut args: impl Iterator<Item = String>) -> Option<String> {
    let channel = args.next()?;
    if args.next().is_some() || !channel.is_channel_name() {
        return None;
    }
    Some(channel)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let Some(channel) = parse_channel(std::env::args().skip(1)) else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };

    // Load configuration
    let (config, path) = Config::discover().map_err(|e| {
        error!(error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!("{}", e);
        }
        anyhow::bail!("invalid configuration ({} errors)", errors.len());
    }

    info!(
        config = %path.as_ref().map_or("<defaults>".into(), |p| p.display().to_string()),
        server = %config.irc.address(),
        nick = %config.irc.nickname,
        channel = %channel,
        "Starting lintbot"
    );

    let pipeline = Pipeline::from_config(&config)?;
    let bot = Bot::new(config, channel, pipeline)?;

    match bot.run().await {
        Ok(()) => {
            info!("Shutdown complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Initial connection failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!(parse_channel(args(&["#python"])), Some("#python".into()));
        assert_eq!(parse_channel(args(&[])), None);
        assert_eq!(parse_channel(args(&["python"])), None);
        assert_eq!(parse_channel(args(&["#a", "#b"])), None);
        assert_eq!(parse_channel(args(&["#bad chan"])), None);
    }
}
