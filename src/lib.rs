//! docspace - workspace / folder / file state synchronizer
//!
//! Modules:
//! - models: entity records, the owning tree, store rows and change events
//! - kernel: store + reducers, change reconciliation, command planning,
//!   view selectors, and the sync engine with its ports/adapters

pub mod kernel;
pub mod models;
