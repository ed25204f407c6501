use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::warn;

use crate::builder::StreamContentBuilder;
use crate::model::StreamContent;

/// How long to keep absorbing a burst of chunks before rebuilding.
const DEBOUNCE: Duration = Duration::from_millis(8);

enum Command {
    Chunk(String),
    Reset,
}

/// Drives the pure builder from a stream of appended chunks.
///
/// Chunks landing in quick succession are coalesced to the latest buffer
/// state before a rebuild. Rebuilds run on the blocking pool from a single
/// worker loop, so results reach the consumer in build order; a consumer
/// should still discard a result once a newer one has arrived. Document
/// errors are logged once per error id across deliveries.
pub struct StreamController {
    commands: mpsc::UnboundedSender<Command>,
}

impl StreamController {
    /// Spawns the worker onto the current tokio runtime and returns the
    /// controller together with the receiver of rebuilt documents.
    pub fn spawn() -> (Self, mpsc::UnboundedReceiver<StreamContent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(command_rx, output_tx));
        (
            Self {
                commands: command_tx,
            },
            output_rx,
        )
    }

    /// Appends a chunk to the buffer and schedules a rebuild.
    pub fn process_chunk(&self, chunk: impl Into<String>) {
        let _ = self.commands.send(Command::Chunk(chunk.into()));
    }

    /// Clears the buffer; the next delivery reflects an empty document.
    pub fn reset(&self) {
        let _ = self.commands.send(Command::Reset);
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    output: mpsc::UnboundedSender<StreamContent>,
) {
    let mut buffer = String::new();
    let mut notified: HashSet<String> = HashSet::new();
    while let Some(command) = commands.recv().await {
        apply(&mut buffer, command);
        // absorb the rest of the burst, keeping only the latest buffer state
        loop {
            tokio::select! {
                _ = tokio::time::sleep(DEBOUNCE) => break,
                next = commands.recv() => match next {
                    Some(command) => apply(&mut buffer, command),
                    None => break,
                },
            }
        }
        let snapshot = buffer.clone();
        let Ok(content) =
            tokio::task::spawn_blocking(move || StreamContentBuilder::new(snapshot).build()).await
        else {
            continue;
        };
        for error in &content.errors {
            if notified.insert(error.id.clone()) {
                warn!(id = %error.id, error = %error.error, "stream parsing error");
            }
        }
        if output.send(content).is_err() {
            break;
        }
    }
}

fn apply(buffer: &mut String, command: Command) {
    match command {
        Command::Chunk(chunk) => buffer.push_str(&chunk),
        Command::Reset => buffer.clear(),
    }
}
