//! Service layer: side effects orchestrated on top of the repositories.

pub mod email;
pub mod notifications;

pub use email::EmailService;
pub use notifications::NotificationDispatcher;
