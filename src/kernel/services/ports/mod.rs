//! Service ports: traits + data contracts.

pub mod config;
pub mod feed;
pub mod navigation;
pub mod store;

pub use config::SyncConfig;
pub use feed::{ChangeFeed, ChangeSubscription};
pub use navigation::{Navigator, Notice, NoticeLevel, Notifier};
pub use store::{DocumentStore, StoreError, StoreFuture, StoreResult};
