//! Navigator and notifier that only write to the log; used by the demo
//! binary where there is no router or toast surface.

use crate::kernel::services::ports::{Navigator, Notice, NoticeLevel, Notifier};
use crate::kernel::Route;

pub struct LogNavigator {
    prefix: String,
}

impl LogNavigator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Navigator for LogNavigator {
    fn navigate(&self, route: &Route) {
        tracing::info!(path = %route.path(&self.prefix), "navigate");
    }
}

#[derive(Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        let description = notice.description.as_deref().unwrap_or("");
        match notice.level {
            NoticeLevel::Success => tracing::info!(title = %notice.title, "notice"),
            NoticeLevel::Error => {
                tracing::error!(title = %notice.title, description, "notice")
            }
        }
    }
}
