//! Page sessions
//!
//! Every open page holds one subscription to the exhibit bus. The session
//! behind it owns a fresh [`NavigationMachine`] rebuilt from the page URL,
//! applies channel messages strictly in arrival order and turns the
//! resulting effects into events for the browser. Messages for the hub are
//! delivered before the next signal is read. Touch input the page sends to
//! its session is applied by the same machine, so it pauses while the
//! channel is down. The session ends after its first navigation: the
//! browser leaves the page and opens a new one.

use crate::exhibit::ExhibitHub;
use crate::registry::{Attachment, SessionRegistry};
use futures::stream::Stream;
use nafm_common::events::{to_input, ChannelMessage, ChannelSignal};
use nafm_common::navigation::{
    Effect, Hint, NavigationMachine, Outcome, PageUrl, TransitionInput,
};
use nafm_common::{Error, RfidTable};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What the browser is told to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Id the page sends its touch input and reconnections with
    Session { id: Uuid },
    /// Leave the page for `url`
    Navigate { url: String },
    /// Same page, new data: reload `url` in place
    Render { url: String },
    Feedback { message: String },
    Connection { connected: bool },
}

impl SessionEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Session { .. } => "session",
            SessionEvent::Navigate { .. } => "navigate",
            SessionEvent::Render { .. } => "render",
            SessionEvent::Feedback { .. } => "feedback",
            SessionEvent::Connection { .. } => "connection",
        }
    }
}

pub struct PageSession {
    id: Uuid,
    machine: NavigationMachine,
    hub: Arc<ExhibitHub>,
    rfid: Arc<RfidTable>,
    finished: bool,
}

impl PageSession {
    pub fn new(url: &PageUrl, hub: Arc<ExhibitHub>, rfid: Arc<RfidTable>) -> Self {
        Self::with_id(Uuid::new_v4(), url, hub, rfid)
    }

    /// Session resuming the mailbox of an earlier subscription
    pub fn with_id(id: Uuid, url: &PageUrl, hub: Arc<ExhibitHub>, rfid: Arc<RfidTable>) -> Self {
        debug!("Session {} opened on {}", id, url);
        Self {
            id,
            machine: NavigationMachine::from_url(url),
            hub,
            rfid,
            finished: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn machine(&self) -> &NavigationMachine {
        &self.machine
    }

    /// True once the page has been told to navigate away
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Apply one input, plus any follow-up the hub answers with
    pub async fn handle(&mut self, input: TransitionInput) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let mut pending = VecDeque::from([input]);

        while let Some(input) = pending.pop_front() {
            if self.finished {
                debug!("Session {} finished, dropping {}", self.id, input.name());
                break;
            }
            let hint = match input {
                TransitionInput::YearCardClicked { .. } if self.machine.is_year_range_detected() => {
                    Some(Hint::OutOfRange)
                }
                TransitionInput::YearCardClicked { .. } => Some(Hint::AwaitingRange),
                _ => None,
            };
            let transition = self.machine.apply(input, &self.rfid);

            match &transition.outcome {
                Outcome::Rejected(Error::UnknownTag(uid)) => events.push(SessionEvent::Feedback {
                    message: format!("Year range object {} not recognised", uid),
                }),
                Outcome::Rejected(_) => {
                    if let Some(hint) = hint {
                        events.push(SessionEvent::Feedback {
                            message: hint.message().to_string(),
                        });
                    }
                }
                _ => {}
            }

            for effect in transition.effects {
                match effect {
                    Effect::Navigate(url) => {
                        info!("Session {} navigating to {}", self.id, url);
                        events.push(SessionEvent::Navigate {
                            url: url.to_string(),
                        });
                        self.finished = true;
                    }
                    Effect::Render => events.push(SessionEvent::Render {
                        url: self.machine.current_url().to_string(),
                    }),
                    Effect::Feedback(message) => events.push(SessionEvent::Feedback { message }),
                    Effect::ConnectionStatus(connected) => {
                        events.push(SessionEvent::Connection { connected })
                    }
                    Effect::Emit(signal) => {
                        if let Some(status) = self.hub.handle_outbound(signal).await {
                            pending.push_back(TransitionInput::StatusSynced(status));
                        }
                    }
                }
            }
        }
        events
    }

    /// Drive the session from `rx` and the page's mailbox until the page
    /// navigates or the bus closes
    ///
    /// Input held while the page was disconnected is applied before the
    /// channel comes up, so the machine replays it on reconnect.
    pub fn into_stream(
        mut self,
        mut rx: broadcast::Receiver<ChannelSignal>,
        registry: Arc<SessionRegistry>,
    ) -> impl Stream<Item = SessionEvent> {
        let Attachment {
            ticket,
            inputs: mut local,
            held,
        } = registry.attach(self.id);
        let mut mailbox = Mailbox {
            registry,
            id: self.id,
            ticket,
            released: false,
        };

        async_stream::stream! {
            yield SessionEvent::Session { id: self.id };

            if !held.is_empty() {
                for event in self.handle(to_input(ChannelMessage::Disconnected)).await {
                    yield event;
                }
                for input in held {
                    for event in self.handle(input).await {
                        yield event;
                    }
                }
            }
            for event in self.handle(to_input(ChannelMessage::Connected)).await {
                yield event;
            }

            while !self.finished {
                let next = tokio::select! {
                    signal = rx.recv() => Next::Signal(signal),
                    Some(input) = local.recv() => Next::Local(input),
                };
                let messages = match next {
                    Next::Local(input) => {
                        for event in self.handle(input).await {
                            yield event;
                        }
                        continue;
                    }
                    Next::Signal(Ok(signal)) => vec![ChannelMessage::Signal(signal)],
                    Next::Signal(Err(RecvError::Lagged(missed))) => {
                        // Missed signals cannot be replayed; pull status instead
                        warn!("Session {} missed {} signals, resyncing", self.id, missed);
                        vec![ChannelMessage::Disconnected, ChannelMessage::Connected]
                    }
                    Next::Signal(Err(RecvError::Closed)) => {
                        for event in self.handle(to_input(ChannelMessage::Disconnected)).await {
                            yield event;
                        }
                        break;
                    }
                };
                for message in messages {
                    for event in self.handle(to_input(message)).await {
                        yield event;
                    }
                }
            }

            if self.finished {
                mailbox.release();
            }
            debug!("Session {} closed", self.id);
        }
    }
}

enum Next {
    Signal(Result<ChannelSignal, RecvError>),
    Local(TransitionInput),
}

/// Keeps the page's mailbox open for a reconnect unless the page navigated
struct Mailbox {
    registry: Arc<SessionRegistry>,
    id: Uuid,
    ticket: u64,
    released: bool,
}

impl Mailbox {
    fn release(&mut self) {
        self.registry.release(self.id, self.ticket);
        self.released = true;
    }
}

impl Drop for Mailbox {
    fn drop(&mut self) {
        if !self.released {
            self.registry.hold(self.id, self.ticket);
        }
    }
}
