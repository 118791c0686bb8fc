//! services/review_cli/src/console/mod.rs
//!
//! The interactive loop: reads commands line by line, applies them to the
//! session and repaints the page.
//!
//! Commands are applied in the order they are typed, but the fetches they
//! trigger run as separate tasks. The console keeps reading while a request
//! is in flight, so a new question or platform switch can supersede it, and
//! the page is repainted again whenever a request completes.

pub mod command;
pub mod render;

use app_review_core::{controller::SessionController, prompts, session::Event};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::CliError;
use command::{parse, Command, HELP};
use render::{render_examples, render_session};

/// Runs the console until `quit`, or until input ends and every request has
/// completed.
///
/// The table for the starting platform is requested first, like a page mount.
pub async fn run<R, W>(
    controller: Arc<SessionController>,
    input: R,
    mut output: W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut in_flight = JoinSet::new();
    start(&controller, Event::TableRequested, &mut in_flight).await;
    paint(&controller, &mut output).await?;

    let mut lines = input.lines();
    let mut input_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                let command = match parse(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        write_text(&mut output, &format!("{}\n", message)).await?;
                        continue;
                    }
                };

                let event = match command {
                    Command::Nothing => continue,
                    Command::Quit => break,
                    Command::Help => {
                        write_text(&mut output, &format!("{}\n", HELP)).await?;
                        continue;
                    }
                    Command::ListExamples => {
                        write_text(&mut output, &render_examples()).await?;
                        continue;
                    }
                    Command::SelectPlatform(platform) => Event::PlatformSelected(platform),
                    Command::SetView(view_mode) => Event::ViewModeChanged(view_mode),
                    Command::Example(position) => match prompts::example(position) {
                        Some(example) => Event::QuestionSubmitted(example.question.to_string()),
                        None => {
                            let message = format!(
                                "There is no example {}; choose 1 to {}.\n",
                                position,
                                prompts::EXAMPLE_QUESTIONS.len()
                            );
                            write_text(&mut output, &message).await?;
                            continue;
                        }
                    },
                    Command::Retry => Event::RetryRequested,
                    Command::Reset => {
                        info!("Resetting session.");
                        Event::Reset
                    }
                    Command::Ask(question) => Event::QuestionSubmitted(question),
                };
                start(&controller, event, &mut in_flight).await;
                paint(&controller, &mut output).await?;
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    error!("Request task ended abnormally: {}", e);
                }
                paint(&controller, &mut output).await?;
            }
            else => break,
        }
    }

    info!("Console closed.");
    Ok(())
}

/// Applies an event now and runs the fetch it asks for in the background.
async fn start(controller: &Arc<SessionController>, event: Event, in_flight: &mut JoinSet<()>) {
    if let Some(effect) = controller.apply(event).await {
        let controller = Arc::clone(controller);
        in_flight.spawn(async move { controller.perform(effect).await });
    }
}

async fn paint<W: AsyncWrite + Unpin>(
    controller: &SessionController,
    output: &mut W,
) -> Result<(), CliError> {
    let state = controller.state().await;
    write_text(output, &render_session(&state)).await
}

async fn write_text<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), CliError> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
