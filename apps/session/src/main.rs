//! Terminal study loop.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use cloze_core::{substitute_digraphs, Difficulty, Item, Status};
use cloze_session::{logging, HttpClient, ItemBuffer, Session, SessionConfig, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

/// Reviews are uploaded after this many finished cards.
const SYNC_EVERY: usize = 5;

/// Time given to the best-effort upload before the process exits.
const BEACON_GRACE: Duration = Duration::from_millis(500);

enum Input {
    Line(String),
    /// End of input.
    Quit,
    /// Ctrl-C.
    Hide,
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Input {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => Input::Hide,
        line = lines.next_line() => match line {
            Ok(Some(line)) => Input::Line(line),
            Ok(None) | Err(_) => Input::Quit,
        },
    }
}

fn render(item: &Item) -> String {
    let mut blank = 0;
    item.sentence
        .parts
        .iter()
        .map(|part| {
            if part.is_blank() {
                blank += 1;
                format!("[{blank}]____")
            } else {
                part.text.clone()
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SessionConfig::from_env()?;
    logging::init();
    info!(server = %config.server_url, l1 = %config.l1, l2 = %config.l2, "Starting study session");

    let client = HttpClient::new(&config);
    let buffer = ItemBuffer::new(Arc::new(client.clone()), Difficulty::default())
        .with_batch_size(config.batch_size);
    let mut session = Session::new(buffer, client, config.evaluator_settings());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut finished = 0;

    let hidden = 'study: loop {
        let next = tokio::select! {
            _ = tokio::signal::ctrl_c() => break 'study true,
            next = session.next_card() => next,
        };
        let mut attempt = match next {
            Ok(Some(attempt)) => attempt,
            Ok(None) => {
                println!("You've finished all reviews for now. Check back again later.");
                break 'study false;
            }
            Err(SessionError::Contract(_)) => continue,
            Err(e) => {
                eprintln!("Unable to load flashcards: {e}");
                break 'study false;
            }
        };

        println!();
        println!("{}", render(attempt.item()));
        println!("  {}", attempt.item().translation.text);

        while !attempt.is_done() {
            let mut inputs = Vec::with_capacity(attempt.blank_count());
            for i in 1..=attempt.blank_count() {
                print!("[{i}]> ");
                std::io::stdout().flush()?;
                match read_line(&mut lines).await {
                    Input::Line(line) => inputs.push(substitute_digraphs(&line)),
                    Input::Quit => {
                        session.finish(attempt);
                        break 'study false;
                    }
                    Input::Hide => {
                        session.finish(attempt);
                        break 'study true;
                    }
                }
            }

            let statuses = session.check(&mut attempt, inputs.as_slice())?;
            for (i, (status, hint)) in statuses.iter().zip(attempt.hints()).enumerate() {
                match status {
                    Status::Incorrect => println!("  [{}] incorrect: {hint}", i + 1),
                    other => println!("  [{}] {}", i + 1, other.as_str()),
                }
            }
        }

        session.finish(attempt);
        finished += 1;
        if finished % SYNC_EVERY == 0 {
            if let Err(e) = session.sync().await {
                warn!(error = %e, "Could not upload reviews");
            }
        }
    };

    if !hidden {
        if let Err(e) = session.sync().await {
            warn!(error = %e, "Could not upload reviews");
        }
    }
    if session.has_unsaved() && session.hide() > 0 {
        tokio::time::sleep(BEACON_GRACE).await;
    }
    Ok(())
}
