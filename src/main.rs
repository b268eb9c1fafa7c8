//! Console chat entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (optional path from argv)
//!   3. Init logger at the configured level
//!   4. Build the completion client and the session
//!   5. Run the console loop until Ctrl-C or EOF

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use banyan_chat::config;
use banyan_chat::error::AppError;
use banyan_chat::llm::providers;
use banyan_chat::logger;
use banyan_chat::session::{ChatSession, EventReceiver, Role, SessionEvent, Submission};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config_path = std::env::args().nth(1);
    let config = config::load(config_path.as_deref())?;

    logger::init(&config.log_level)?;
    info!(
        backend = %config.llm.provider,
        model = %config.llm.openai.request.model,
        "config loaded"
    );

    let client = providers::build(&config.llm, config.llm_api_key.clone())?;
    if let Err(e) = client.ping().await {
        warn!(error = %e, "completion endpoint unreachable — requests may fail");
    }

    let (session, mut events) =
        ChatSession::new(client, config.llm.openai.request.clone(), &config.session);

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    println!("─────────────────────────────────");
    println!(" banyan-chat console  (Ctrl-C to quit)");
    println!("─────────────────────────────────");
    if let Some(greeting) = &config.session.greeting {
        // Displayed only — the greeting never enters the transcript.
        println!("{greeting}");
    }

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!();
                info!("shutdown signal received — closing console");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("stdin read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        let input = input.trim();
                        if input.is_empty() {
                            continue;
                        }
                        match session.submit_user_message(input).await {
                            Submission::Accepted => print_events(&mut events),
                            Submission::RejectedTooShort => println!(
                                "(message too short — write at least {} characters)",
                                config.session.min_user_chars
                            ),
                            Submission::RejectedBusy => {}
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Drain and render the events queued by a completed round-trip.
fn print_events(events: &mut EventReceiver) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::MessageAppended(msg) => {
                if msg.role == Role::Assistant {
                    println!("{}", msg.content);
                }
            }
            SessionEvent::Failure(e) => println!("(request failed: {e})"),
            SessionEvent::SendEnabledChanged(_) => {}
        }
    }
}
