//! Navigation state machine
//!
//! The kiosk moves between four logical pages as exhibit hardware events
//! arrive. A page load carries its whole selection in the URL, so every page
//! rebuilds a fresh [`NavigationMachine`] from its [`PageUrl`] and feeds it
//! [`TransitionInput`]s one at a time. [`NavigationMachine::apply`] is the
//! only place transitions are decided; it returns the [`Effect`]s for the
//! caller to carry out.

mod input;
mod machine;
mod state;
mod url;

pub use input::{Effect, Outcome, Transition, TransitionInput};
pub use machine::NavigationMachine;
pub use state::{Hint, Page, PageKind, SelectionContext};
pub use url::{PageQuery, PageUrl};
