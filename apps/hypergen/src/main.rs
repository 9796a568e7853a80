use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    select_share_action, HttpGenerationBackend, LifecycleTrigger, RequestController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod platform;
mod render;

use commands::{AppSession, Step, UserCommand, HELP_TEXT};

#[derive(Parser, Debug)]
#[command(
    name = "hypergen",
    about = "Generate chat, image, video, audio and a motion concept from one prompt"
)]
struct Args {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    page_url: Option<String>,
    /// Share through the desktop mail client instead of the clipboard.
    #[arg(long)]
    native_share: bool,
}

fn print_screen(session: &AppSession) {
    let controller = session.controller();
    println!(
        "\n{}",
        render::render(session.prompt(), controller.state(), controller.store())
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)?;
    if let Some(v) = args.backend_url {
        settings.backend_url = config::normalize_backend_url(&v);
    }
    if let Some(v) = args.timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = args.page_url {
        settings.page_url = Some(v);
    }
    settings.native_share |= args.native_share;
    info!(backend_url = %settings.backend_url, "starting hypergen");

    let backend = HttpGenerationBackend::new(&settings.backend_url)?;
    let controller = RequestController::new(Arc::new(backend))
        .with_request_timeout(settings.request_timeout());
    let share = select_share_action(
        platform::probe_native_share(settings.native_share),
        Arc::new(platform::ArboardClipboard),
    );
    let mut session = AppSession::new(controller, share, settings.page_url());

    let mut trigger = LifecycleTrigger::new();
    trigger.on_start(session.controller_mut());
    println!("{HELP_TEXT}");
    print_screen(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    // Piped input: let the last request land before exiting.
                    if session.controller().state().is_loading() {
                        session.controller_mut().settle().await;
                        print_screen(&session);
                    }
                    break;
                };
                match session.dispatch(UserCommand::parse(&line)).await {
                    Step::Redraw => print_screen(&session),
                    Step::Notice(notice) => println!("{notice}"),
                    Step::Quit => break,
                }
            }
            Some(completion) = session.controller_mut().recv_completion() => {
                if session.controller_mut().apply(completion) {
                    print_screen(&session);
                }
            }
        }
    }

    Ok(())
}
