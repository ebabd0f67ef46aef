pub mod config;
pub mod manager;


pub use config::{RepoSettings, ServerSettings, Settings, UpdateSettings};
pub use manager::SettingsManager;
