//! External service traits and in-memory implementations.

pub mod notification;
pub mod settings;

pub use notification::{
    InMemoryNotificationGateway, NotificationGateway, NotifyError, SentNotification,
};
pub use settings::{InMemorySettings, SettingsProvider};
