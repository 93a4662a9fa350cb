//! Change-feed contract: one ordered stream of row events per table.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::models::{ChangeEvent, Table};

pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self, table: Table) -> ChangeSubscription;
}

/// Dropping the subscription unsubscribes.
pub struct ChangeSubscription {
    table: Table,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    pub fn new(table: Table, rx: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { table, rx }
    }

    /// Next event, or `None` once the feed is closed. Missed events are
    /// logged and skipped.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(table = %self.table, skipped, "change feed lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
