//! Headless sync core (state/action/effect).

pub mod action;
pub mod commands;
pub mod effect;
pub mod reconcile;
pub mod services;
pub mod state;
pub mod store;
pub mod view;

pub use action::Action;
pub use commands::{Planner, UserCommand};
pub use effect::{Effect, PersistOp, PersistRequest, Step};
pub use reconcile::reconcile;
pub use state::{AppState, Route, ViewSelection};
pub use store::{reduce, DispatchResult, Store};
pub use view::{SaveStatus, ViewCache, ViewModel};
