//! mailpluck - pull messages, headers and subject listings out of an IMAP
//! mailbox.
//!
//! Retrieved content goes to stdout; logs and diagnostics go to stderr.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mailpluck_imap::{Client, ErrorKind, Selected};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Args, Operation};
use crate::output::{Output, exit_code, report};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = report(&err, &mut std::io::stdout(), &mut std::io::stderr());
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.config();
    tracing::debug!(?config, command = ?args.command, "starting");

    let client = Client::connect(&config).await?;
    let client = client.login(&args.user, &args.password).await?;
    let mut client = client.select(args.mailbox()).await?;

    let result = perform(&mut client, args).await;
    let healthy = result
        .as_ref()
        .err()
        .is_none_or(|err| err.kind() != ErrorKind::Transport);
    if healthy && let Err(err) = client.logout().await {
        tracing::warn!(error = %err, "logout failed");
    }

    result?
        .write_to(&mut std::io::stdout().lock(), &mut std::io::stderr())
        .context("failed to write output")
}

/// Runs the requested operation against the selected mailbox.
async fn perform<S>(
    client: &mut Client<S, Selected>,
    args: &Args,
) -> mailpluck_imap::Result<Output>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let seq = args.seq();
    let output = match args.command {
        Operation::Retrieve => Output::Raw(client.fetch_raw(seq).await?.to_vec()),
        Operation::Parse => Output::Summary(client.fetch_header_summary(seq).await?),
        Operation::Mime => {
            let part = client.fetch_mime_text(seq).await?;
            Output::text(part, args.decode)?
        }
        Operation::List => Output::Listing(client.list_subjects().await?),
    };
    Ok(output)
}
