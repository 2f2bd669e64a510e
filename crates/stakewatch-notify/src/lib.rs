//! Alert digests: what the scan tells a human, and how it gets to them.

pub mod digest;
pub mod text;

#[cfg(feature = "smtp")]
pub mod smtp;

pub use digest::Digest;

#[cfg(feature = "smtp")]
pub use smtp::{Mailer, NotifyError, SmtpSettings};
