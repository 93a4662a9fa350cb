//! Service adapters: store, settings, directories and runtime.

pub mod console;
pub mod dirs;
pub mod memory;
pub mod runtime;
pub mod settings;

pub use console::{LogNavigator, LogNotifier};
pub use dirs::{ensure_log_dir, get_config_dir, get_log_dir};
pub use memory::MemoryStore;
pub use runtime::AsyncRuntime;
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, SettingsError,
};
