pub mod config;
pub mod handlers;
pub mod import;
pub mod intake;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LoggingConfig, NotificationSettings, ServerConfig};
pub use import::{ImportError, ImportReport};
pub use intake::AppointmentResponse;
pub use observability::init_tracing;
pub use server::{AppState, DocfinderServer, ServerBuilder, build_app};
