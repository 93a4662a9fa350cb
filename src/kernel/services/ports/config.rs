use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine and planner settings; every field falls back to its default when
/// absent from `settings.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub route_prefix: String,
    pub body_debounce_ms: u64,
    pub default_title: String,
    pub default_icon: String,
    pub log_filter: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            route_prefix: "/dashboard".to_string(),
            body_debounce_ms: 850,
            default_title: "Untitled".to_string(),
            default_icon: "📄".to_string(),
            log_filter: "docspace=info".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn body_debounce(&self) -> Duration {
        Duration::from_millis(self.body_debounce_ms)
    }
}
