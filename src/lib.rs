// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;

// Re-export commonly used types
pub use api::*;
pub use config::{MonitorConfig, TelegramConfig, Thresholds};
pub use error::{NotificationError, UpstreamDataError};
pub use models::*;
pub use monitor::Monitor;
