//=========================================================================
// Event Mailbox
//=========================================================================
//
// Hands events produced on background threads (asset loading, scripted
// controllers) over to the UI thread.
//
// Architecture:
//   EventSender (any thread) → bounded channel → drain_into() (UI thread)
//
// Draining is bounded per frame so a flood of events cannot starve
// rendering; leftovers are delivered on the next frame in FIFO order.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, SendError, Sender, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::GameEvent;

//=== EventSender =========================================================

/// Cloneable producer handle for the mailbox.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
}

impl EventSender {
    /// Queues an event for delivery on the UI thread.
    ///
    /// Blocks while the mailbox is full. Fails only if the mailbox was
    /// dropped, in which case the event is handed back.
    pub fn send(&self, event: GameEvent) -> Result<(), SendError<GameEvent>> {
        self.sender.send(event)
    }
}

//=== EventMailbox ========================================================

/// UI-thread side of the event hand-over channel.
pub struct EventMailbox {
    receiver: Receiver<GameEvent>,
    sender: Sender<GameEvent>,
    max_per_frame: usize,
}

impl EventMailbox {
    /// Default number of events delivered per frame.
    pub const DEFAULT_MAX_PER_FRAME: usize = 100;

    /// Creates a mailbox holding at most `capacity` undelivered events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Mailbox capacity must be positive");
        let (sender, receiver) = bounded(capacity);
        Self {
            receiver,
            sender,
            max_per_frame: Self::DEFAULT_MAX_PER_FRAME,
        }
    }

    /// Limits how many events a single drain delivers.
    pub fn with_max_per_frame(mut self, max_per_frame: usize) -> Self {
        self.max_per_frame = max_per_frame.max(1);
        self
    }

    /// Returns a new producer handle.
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Number of events waiting for delivery.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Moves queued events into `out`, preserving arrival order.
    ///
    /// Returns the number of events moved.
    pub fn drain_into(&self, out: &mut Vec<GameEvent>) -> usize {
        let mut drained = 0;

        while drained < self.max_per_frame {
            match self.receiver.try_recv() {
                Ok(event) => {
                    out.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if drained >= self.max_per_frame && !self.receiver.is_empty() {
            warn!(
                target: "events",
                "Mailbox backlog: delivered {} events, {} deferred to next frame",
                drained,
                self.receiver.len()
            );
        } else if drained > 0 {
            trace!(target: "events", "Mailbox delivered {} events", drained);
        }

        drained
    }
}

impl Default for EventMailbox {
    fn default() -> Self {
        Self::new(256)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
