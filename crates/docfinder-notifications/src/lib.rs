pub mod adapters;
pub mod error;
pub mod processor;
pub mod queue;
pub mod templates;
pub mod types;

pub use adapters::{
    EmailAdapter, LogAdapter, NotificationAdapter, RenderedContent, SendResult, SmtpConfig,
};
pub use error::NotificationError;
pub use processor::NotificationProcessor;
pub use queue::{ChannelQueue, NotificationQueue, NotificationReceiver};
pub use templates::{APPOINTMENT_CONFIRMATION, Template, TemplateRenderer};
pub use types::*;
