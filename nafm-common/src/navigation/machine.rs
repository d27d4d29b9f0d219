//! Transition rules

use super::input::{Effect, Transition, TransitionInput};
use super::state::{Page, PageKind, SelectionContext};
use super::url::PageUrl;
use crate::events::{HubState, OutboundSignal, StatusSnapshot};
use crate::{Error, ObjectId, RfidTable, SectionId, YearRange};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Navigation state for one page load
///
/// Owned by exactly one page controller or subscription at a time. Inputs
/// are applied strictly one after another; a rejected input leaves the
/// machine untouched.
#[derive(Debug, Clone)]
pub struct NavigationMachine {
    page: PageKind,
    context: SelectionContext,
    connected: bool,
    /// Local interactions received while the channel was down
    paused: VecDeque<TransitionInput>,
}

impl Default for NavigationMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationMachine {
    /// Machine on the landing page with an empty selection
    pub fn new() -> Self {
        Self {
            page: PageKind::Landing,
            context: SelectionContext::empty(),
            connected: true,
            paused: VecDeque::new(),
        }
    }

    /// Rebuild the machine a page was loaded with
    pub fn from_url(url: &PageUrl) -> Self {
        Self {
            page: url.kind,
            context: url.context,
            connected: true,
            paused: VecDeque::new(),
        }
    }

    pub fn page_kind(&self) -> PageKind {
        self.page
    }

    pub fn context(&self) -> &SelectionContext {
        &self.context
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Interactions waiting for the channel to come back
    pub fn paused_len(&self) -> usize {
        self.paused.len()
    }

    /// URL of the page the machine is on
    pub fn current_url(&self) -> PageUrl {
        PageUrl::new(self.page, self.context)
    }

    /// Current page with its data
    pub fn state(&self) -> Page {
        let c = &self.context;
        match (self.page, c.section_id) {
            (PageKind::Section, Some(section)) => Page::SectionOverview { section },
            (PageKind::YearList, Some(section)) => Page::YearList {
                section,
                range: c.year_range,
            },
            (PageKind::YearDetail, Some(section)) => match (c.year_range, c.year) {
                (Some(range), Some(year)) => Page::YearDetail {
                    section,
                    range,
                    year,
                },
                _ => Page::Landing,
            },
            _ => Page::Landing,
        }
    }

    /// Year selection is only possible once a range has been detected
    pub fn is_year_range_detected(&self) -> bool {
        matches!(self.state(), Page::YearList { range: Some(_), .. })
    }

    /// Apply one input and report the effects to carry out
    pub fn apply(&mut self, input: TransitionInput, rfid: &RfidTable) -> Transition {
        if input.is_local() && !self.connected {
            debug!("Channel down, holding {} until reconnect", input.name());
            self.paused.push_back(input);
            return Transition::deferred();
        }

        let name = input.name();
        let from = self.page;
        let transition = self.step(input, rfid);
        match &transition.outcome {
            super::Outcome::Rejected(e) => {
                warn!("Ignored {} on {} page: {}", name, from, e);
            }
            _ => {
                debug!("{} on {} page -> {} page", name, from, self.page);
            }
        }
        transition
    }

    fn step(&mut self, input: TransitionInput, rfid: &RfidTable) -> Transition {
        let state = self.state();
        match input {
            TransitionInput::ObjectDropped => self.reset(),

            TransitionInput::ObjectPicked { object } => match state {
                Page::Landing => match object.parse::<ObjectId>() {
                    Ok(object) => Transition::accepted(vec![
                        self.navigate(PageKind::Section, SelectionContext::for_object(object)),
                    ]),
                    Err(e) => Transition::rejected(e),
                },
                _ => no_row("object-pick", state),
            },

            TransitionInput::TagDetected { uid, object } => match state {
                Page::SectionOverview { section } => {
                    let object = match self.object_for(section, object.as_deref()) {
                        Ok(object) => object,
                        Err(e) => return Transition::rejected(e),
                    };
                    let Some(range) = rfid.resolve(&uid) else {
                        return Transition::rejected(Error::UnknownTag(uid));
                    };
                    let context = SelectionContext {
                        picked_object: Some(object),
                        section_id: Some(section),
                        year_range: Some(range),
                        year: None,
                    };
                    Transition::accepted(vec![
                        Effect::Emit(OutboundSignal::ResolveYearFromRfid {
                            uid,
                            year_range: range,
                            object: object.as_str().to_string(),
                        }),
                        self.navigate(PageKind::YearList, context),
                    ])
                }
                _ => no_row("tag-detected", state),
            },

            TransitionInput::YearDropped { range, object } => {
                let section = match state {
                    Page::SectionOverview { section } | Page::YearList { section, .. } => section,
                    _ => return no_row("year-range-drop", state),
                };
                let object = match self.object_for(section, Some(&object)) {
                    Ok(object) => object,
                    Err(e) => return Transition::rejected(e),
                };
                let range = match range.parse::<YearRange>() {
                    Ok(range) if rfid.has_range(&range) => range,
                    Ok(range) => {
                        return Transition::rejected(Error::InvalidRange(range.to_string()))
                    }
                    Err(e) => return Transition::rejected(e),
                };
                let context = SelectionContext {
                    picked_object: Some(object),
                    section_id: Some(section),
                    year_range: Some(range),
                    year: None,
                };
                if let Page::YearList { .. } = state {
                    self.context = context;
                    Transition::accepted(vec![Effect::Render])
                } else {
                    Transition::accepted(vec![self.navigate(PageKind::YearList, context)])
                }
            }

            TransitionInput::RangeNotDetected { object } => match state {
                Page::YearList { section, .. } => {
                    let object = match self.object_for(section, object.as_deref()) {
                        Ok(object) => object,
                        Err(e) => return Transition::rejected(e),
                    };
                    Transition::accepted(vec![
                        self.navigate(PageKind::Section, SelectionContext::for_object(object)),
                    ])
                }
                // Already there; nothing to undo
                Page::SectionOverview { .. } => Transition::accepted(Vec::new()),
                _ => no_row("range-not-detected", state),
            },

            TransitionInput::YearCardClicked { year } => match state {
                Page::YearList { range: None, .. } => Transition::rejected(
                    Error::InvalidTransition("year range not detected yet".to_string()),
                ),
                Page::YearList {
                    range: Some(range), ..
                } => {
                    if !range.contains(year) {
                        return Transition::rejected(Error::InvalidTransition(format!(
                            "year {} outside {}",
                            year, range
                        )));
                    }
                    let context = SelectionContext {
                        year: Some(year),
                        ..self.context
                    };
                    Transition::accepted(vec![self.navigate(PageKind::YearDetail, context)])
                }
                _ => no_row("year-card-click", state),
            },

            TransitionInput::PreviousYear | TransitionInput::NextYear => match state {
                Page::YearDetail { range, year, .. } => {
                    let target = if input == TransitionInput::PreviousYear {
                        range.previous(year)
                    } else {
                        range.next(year)
                    };
                    match target {
                        Some(target) => {
                            let context = SelectionContext {
                                year: Some(target),
                                ..self.context
                            };
                            Transition::accepted(vec![
                                self.navigate(PageKind::YearDetail, context),
                            ])
                        }
                        None => Transition::rejected(Error::InvalidTransition(format!(
                            "{} is at the edge of {}",
                            year, range
                        ))),
                    }
                }
                _ => no_row(input.name(), state),
            },

            TransitionInput::StatusSynced(status) => self.sync(state, status),

            TransitionInput::NoObjectDetected { .. } | TransitionInput::ChannelError { .. } => {
                Transition::accepted(Vec::new())
            }

            TransitionInput::UnknownTag { .. } => Transition::accepted(vec![Effect::Feedback(
                "Year range object not recognised. Please try another one.".to_string(),
            )]),

            TransitionInput::HardwareStatus { connected } => {
                if connected {
                    Transition::accepted(Vec::new())
                } else {
                    Transition::accepted(vec![Effect::Feedback(
                        "Exhibit hardware is not responding.".to_string(),
                    )])
                }
            }

            TransitionInput::ChannelDisconnected => {
                let was_connected = self.connected;
                self.connected = false;
                if was_connected {
                    Transition::accepted(vec![Effect::ConnectionStatus(false)])
                } else {
                    Transition::accepted(Vec::new())
                }
            }

            TransitionInput::ChannelConnected => {
                self.connected = true;
                let mut effects = vec![
                    Effect::ConnectionStatus(true),
                    Effect::Emit(OutboundSignal::GetStatus),
                ];
                while let Some(held) = self.paused.pop_front() {
                    let replayed = self.apply(held, rfid);
                    let leaves_page = replayed.navigation().is_some();
                    effects.extend(replayed.effects);
                    if leaves_page {
                        self.paused.clear();
                    }
                }
                Transition::accepted(effects)
            }
        }
    }

    /// Resolve the object an inbound event refers to, defaulting to the
    /// current selection, and check it belongs to `section`
    fn object_for(&self, section: SectionId, object: Option<&str>) -> crate::Result<ObjectId> {
        let object = match object {
            Some(raw) => raw.parse::<ObjectId>()?,
            None => self.context.picked_object.unwrap_or_else(|| section.object()),
        };
        if object.section() != section {
            return Err(Error::InvalidTransition(format!(
                "object {} does not belong to section {}",
                object, section
            )));
        }
        Ok(object)
    }

    fn navigate(&mut self, kind: PageKind, context: SelectionContext) -> Effect {
        let url = PageUrl::new(kind, context);
        self.page = kind;
        self.context = url.context;
        Effect::Navigate(url)
    }

    fn reset(&mut self) -> Transition {
        if self.page == PageKind::Landing {
            self.context = SelectionContext::empty();
            return Transition::accepted(Vec::new());
        }
        self.paused.clear();
        Transition::accepted(vec![
            self.navigate(PageKind::Landing, SelectionContext::empty()),
        ])
    }

    /// Reconcile with the hub's view after a status pull
    ///
    /// The page only moves when the hub knows more than the page does: a
    /// different section, or a range the page is not showing. A hub with no
    /// object picked leaves the page alone, so manual browsing still works
    /// without hardware.
    fn sync(&mut self, state: Page, status: StatusSnapshot) -> Transition {
        let target = match (status.current_state, status.picked_object, status.dropped_year) {
            (HubState::Main, _, _) => return Transition::accepted(Vec::new()),
            (HubState::Section, Some(object), _) => Page::SectionOverview {
                section: object.section(),
            },
            (HubState::YearList, Some(object), Some(range)) => Page::YearList {
                section: object.section(),
                range: Some(range),
            },
            _ => {
                return Transition::rejected(Error::InvalidTransition(format!(
                    "incomplete status for state {}",
                    status.current_state
                )))
            }
        };

        match (state, target) {
            (_, Page::SectionOverview { section }) => {
                if state.section() == Some(section) {
                    return Transition::accepted(Vec::new());
                }
                Transition::accepted(vec![self.navigate(
                    PageKind::Section,
                    SelectionContext::for_object(section.object()),
                )])
            }
            (
                Page::YearList { section: a, range: current },
                Page::YearList { section: b, range: Some(range) },
            ) if a == b => {
                if current == Some(range) {
                    return Transition::accepted(Vec::new());
                }
                self.context.picked_object = Some(b.object());
                self.context.year_range = Some(range);
                Transition::accepted(vec![Effect::Render])
            }
            (
                Page::YearDetail { section: a, range: current, .. },
                Page::YearList { section: b, range: Some(range) },
            ) if a == b && current == range => Transition::accepted(Vec::new()),
            (_, Page::YearList { section, range }) => {
                let context = SelectionContext {
                    picked_object: Some(section.object()),
                    section_id: Some(section),
                    year_range: range,
                    year: None,
                };
                Transition::accepted(vec![self.navigate(PageKind::YearList, context)])
            }
            _ => Transition::accepted(Vec::new()),
        }
    }
}

fn no_row(input: &str, state: Page) -> Transition {
    Transition::rejected(Error::InvalidTransition(format!(
        "{} not accepted on {} page",
        input,
        state.kind()
    )))
}
