use std::collections::VecDeque;
use std::io;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// SIGINT delivered to the process (e.g. `kill -INT`). In raw mode a
    /// typed Ctrl+C arrives as a key instead.
    Interrupt,
}

/// Non-blocking access to pending input.
pub trait EventSource {
    fn try_next(&mut self) -> Option<Event>;
}

impl EventSource for VecDeque<Event> {
    fn try_next(&mut self) -> Option<Event> {
        self.pop_front()
    }
}

/// Forwards terminal key presses and interrupts from a background task.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(forward_events(
            EventStream::new(),
            tokio::signal::ctrl_c(),
            tx,
        ));

        Self { rx, task }
    }
}

/// Pumps key presses and the interrupt into `tx`. The interrupt stays armed
/// after the input stream fails or ends.
async fn forward_events<S, F>(mut reader: S, interrupt: F, tx: mpsc::UnboundedSender<Event>)
where
    S: Stream<Item = io::Result<CrosstermEvent>> + Unpin,
    F: Future<Output = io::Result<()>>,
{
    let mut interrupt = std::pin::pin!(interrupt);
    let mut reader_alive = true;
    let mut interrupt_armed = true;

    while reader_alive || interrupt_armed {
        tokio::select! {
            maybe_event = reader.next(), if reader_alive => {
                match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        if tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(%err, "terminal input stream failed");
                        reader_alive = false;
                    }
                    None => reader_alive = false,
                }
            }
            result = &mut interrupt, if interrupt_armed => {
                interrupt_armed = false;
                match result {
                    Ok(()) => {
                        if tx.send(Event::Interrupt).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "interrupt handler unavailable"),
                }
            }
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for EventHandler {
    fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
