pub mod config;
pub mod error;

pub use config::{Config, HighlightColor, Theme};
pub use error::SettingsError;
