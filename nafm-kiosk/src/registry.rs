//! Mailboxes for local interactions
//!
//! A page that knows its session id sends touch input to its own session
//! instead of deciding the move statelessly. While the page's event stream
//! is down the mailbox holds those inputs; the next subscription with the
//! same id picks them up and the session's machine replays them once the
//! channel is back.

use nafm_common::navigation::TransitionInput;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Inputs kept per disconnected page
pub const MAX_HELD_INPUTS: usize = 16;

/// How long a disconnected page's mailbox is kept
pub const HELD_TTL: Duration = Duration::from_secs(600);

enum Slot {
    Live {
        tx: mpsc::UnboundedSender<TransitionInput>,
        ticket: u64,
    },
    Held {
        inputs: Vec<TransitionInput>,
        since: Instant,
    },
}

/// What happened to a delivered input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the live session
    Forwarded,
    /// Kept until the page reconnects
    Held,
    /// No such session; the caller decides on its own
    Unknown,
}

/// A subscription's hold on its page's mailbox
pub struct Attachment {
    /// Identifies this subscription; a later one for the same page gets a
    /// new ticket
    pub ticket: u64,
    pub inputs: mpsc::UnboundedReceiver<TransitionInput>,
    /// Input kept while the page was disconnected, oldest first
    pub held: Vec<TransitionInput>,
}

#[derive(Default)]
pub struct SessionRegistry {
    slots: Mutex<HashMap<Uuid, Slot>>,
    next_ticket: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Slot>> {
        // A panic while holding the lock leaves the map itself intact
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open (or reopen) the mailbox for `id`
    ///
    /// A page reconnecting takes over the mailbox from its earlier
    /// subscription, along with whatever was held meanwhile.
    pub fn attach(&self, id: Uuid) -> Attachment {
        let (tx, inputs) = mpsc::unbounded_channel();
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let mut slots = self.slots();
        purge_expired(&mut slots);
        let held = match slots.insert(id, Slot::Live { tx, ticket }) {
            Some(Slot::Held { inputs, .. }) => inputs,
            _ => Vec::new(),
        };
        if !held.is_empty() {
            debug!("Session {} reattached with {} held input(s)", id, held.len());
        }
        Attachment {
            ticket,
            inputs,
            held,
        }
    }

    /// The subscription holding `ticket` dropped without navigating: hold
    /// the page's input until it reconnects
    pub fn hold(&self, id: Uuid, ticket: u64) {
        let mut slots = self.slots();
        purge_expired(&mut slots);
        if owns(&slots, id, ticket) {
            slots.insert(
                id,
                Slot::Held {
                    inputs: Vec::new(),
                    since: Instant::now(),
                },
            );
            debug!("Session {} disconnected, holding local input", id);
        }
    }

    /// The page navigated away; nothing more will arrive for it
    pub fn release(&self, id: Uuid, ticket: u64) {
        let mut slots = self.slots();
        if owns(&slots, id, ticket) {
            slots.remove(&id);
        }
    }

    pub fn deliver(&self, id: Uuid, input: TransitionInput) -> Delivery {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(&id) else {
            return Delivery::Unknown;
        };
        match slot {
            Slot::Live { tx, .. } => match tx.send(input) {
                Ok(()) => Delivery::Forwarded,
                Err(mpsc::error::SendError(input)) => {
                    // Receiver gone but the stream has not reported it yet
                    *slot = Slot::Held {
                        inputs: vec![input],
                        since: Instant::now(),
                    };
                    Delivery::Held
                }
            },
            Slot::Held { inputs, .. } => {
                if inputs.len() >= MAX_HELD_INPUTS {
                    warn!("Session {} mailbox full, dropping {}", id, input.name());
                } else {
                    inputs.push(input);
                }
                Delivery::Held
            }
        }
    }

    /// Inputs currently held for `id`
    pub fn held_len(&self, id: Uuid) -> usize {
        match self.slots().get(&id) {
            Some(Slot::Held { inputs, .. }) => inputs.len(),
            _ => 0,
        }
    }

    pub fn is_live(&self, id: Uuid) -> bool {
        matches!(self.slots().get(&id), Some(Slot::Live { .. }))
    }
}

/// Whether the subscription holding `ticket` is still the page's live one
fn owns(slots: &HashMap<Uuid, Slot>, id: Uuid, ticket: u64) -> bool {
    matches!(slots.get(&id), Some(Slot::Live { ticket: live, .. }) if *live == ticket)
}

fn purge_expired(slots: &mut HashMap<Uuid, Slot>) {
    slots.retain(|_, slot| match slot {
        Slot::Held { since, .. } => since.elapsed() < HELD_TTL,
        Slot::Live { .. } => true,
    });
}
