//! Local interactions: touch input on the kiosk screen
//!
//! Links on the rendered pages point here with the page's URL state. A page
//! whose session is live or held hands the input to that session and stays
//! put (204); its event stream carries the outcome. Otherwise a machine
//! rebuilt from the URL decides: an accepted move redirects to the new page
//! and a refused one returns to the originating page with a hint.

use super::PageStateQuery;
use crate::registry::Delivery;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use nafm_common::navigation::{
    Hint, NavigationMachine, PageKind, PageUrl, TransitionInput,
};
use nafm_common::Error;
use tracing::{debug, warn};

/// Actions reachable from page links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pick,
    SelectYear,
    PreviousYear,
    NextYear,
}

impl std::str::FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pick" => Ok(Action::Pick),
            "select-year" => Ok(Action::SelectYear),
            "previous-year" => Ok(Action::PreviousYear),
            "next-year" => Ok(Action::NextYear),
            other => Err(Error::InvalidInput(format!("unknown action: {}", other))),
        }
    }
}

/// GET /interact/{action}
pub async fn interact(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Query(mut query): Query<PageStateQuery>,
) -> Response {
    let action = match action.parse::<Action>() {
        Ok(action) => action,
        Err(e) => {
            warn!("{}", e);
            return Redirect::to("/").into_response();
        }
    };

    let input = match action {
        Action::Pick => {
            let object = query.object.take().unwrap_or_default();
            TransitionInput::ObjectPicked { object }
        }
        Action::SelectYear => {
            // `year` is the clicked card, not part of the year list's state
            let year = query.year.take().and_then(|y| y.trim().parse::<i32>().ok());
            match year {
                Some(year) => TransitionInput::YearCardClicked { year },
                None => return Redirect::to("/").into_response(),
            }
        }
        Action::PreviousYear => TransitionInput::PreviousYear,
        Action::NextYear => TransitionInput::NextYear,
    };

    if let Some(id) = query.session.take() {
        match state.sessions.deliver(id, input.clone()) {
            Delivery::Forwarded | Delivery::Held => {
                debug!("{:?} delivered to session {}", action, id);
                return StatusCode::NO_CONTENT.into_response();
            }
            Delivery::Unknown => debug!("Session {} unknown, deciding from URL", id),
        }
    }

    let origin = match query
        .into_parts()
        .and_then(|(kind, query)| query.page_url(kind, &state.rfid))
    {
        Ok(url) => url,
        Err(e) => {
            warn!("Interaction from invalid page state: {}", e);
            return Redirect::to("/").into_response();
        }
    };

    let mut machine = NavigationMachine::from_url(&origin);
    let transition = machine.apply(input, &state.rfid);
    if let Some(target) = transition.navigation() {
        return Redirect::to(&target.to_string()).into_response();
    }

    debug!("{:?} refused on {}", action, origin);
    Redirect::to(&refused(action, &machine, origin).to_string()).into_response()
}

/// Where a refused interaction lands
fn refused(action: Action, machine: &NavigationMachine, origin: PageUrl) -> PageUrl {
    match (action, origin.kind) {
        (Action::SelectYear, PageKind::YearList) => {
            let hint = if machine.is_year_range_detected() {
                Hint::OutOfRange
            } else {
                Hint::AwaitingRange
            };
            PageUrl::new(origin.kind, origin.context).with_hint(hint)
        }
        _ => PageUrl::new(origin.kind, origin.context),
    }
}
