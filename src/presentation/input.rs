// Stdin reader that turns typed coordinates into manual refresh triggers
use crate::application::refresh_scheduler::ManualTrigger;
use anyhow::Context;
use std::io::BufRead;
use tokio::sync::{mpsc, oneshot};

/// Split `"<lat> <lon>"` or `"<lat>,<lon>"`. Missing parts come through empty so the
/// scheduler rejects them with a message instead of this reader guessing.
pub fn parse_trigger(line: &str) -> ManualTrigger {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let latitude = parts.next().unwrap_or_default();
    let longitude = parts.next().unwrap_or_default();
    ManualTrigger::new(latitude, longitude)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// The user asked to leave
    Quit,
    /// Input hit EOF or the scheduler stopped listening
    Closed,
}

/// Forward lines until EOF, `quit`, or the scheduler goes away. Blocks the calling thread.
pub fn forward_lines(
    input: impl BufRead,
    triggers: &mpsc::Sender<ManualTrigger>,
) -> anyhow::Result<InputEnd> {
    for line in input.lines() {
        let line = line?;
        if matches!(line.trim(), "q" | "quit" | "exit") {
            return Ok(InputEnd::Quit);
        }
        if triggers.blocking_send(parse_trigger(&line)).is_err() {
            break;
        }
    }

    tracing::debug!("Stopped reading coordinates");
    Ok(InputEnd::Closed)
}

/// Read `input` on its own OS thread and report how it ended.
///
/// The thread is detached from the runtime, so a read that never returns cannot hold up
/// shutdown.
pub fn spawn_reader<R>(
    input: R,
    triggers: mpsc::Sender<ManualTrigger>,
) -> anyhow::Result<oneshot::Receiver<InputEnd>>
where
    R: BufRead + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();
    std::thread::Builder::new()
        .name("coordinate-input".to_string())
        .spawn(move || {
            let end = forward_lines(input, &triggers).unwrap_or_else(|e| {
                tracing::warn!("Coordinate input failed: {}", e);
                InputEnd::Closed
            });
            let _ = done_tx.send(end);
        })
        .context("Failed to start coordinate input thread")?;
    Ok(done_rx)
}
