//! SMTP delivery over STARTTLS.

use std::time::Duration;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::info;

use crate::Digest;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid address {address:?}: {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Relay and envelope settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    /// One address, or several separated by commas.
    pub to: String,
}

pub struct Mailer {
    settings: SmtpSettings,
}

impl Mailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Build the multipart/alternative message without sending it.
    pub fn build_message(&self, digest: &Digest) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.settings.from)?)
            .subject(digest.subject.as_str());
        for to in self.settings.to.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            builder = builder.to(parse_mailbox(to)?);
        }
        let message = builder.multipart(MultiPart::alternative_plain_html(
            digest.text_body.clone(),
            digest.html_body.clone(),
        ))?;
        Ok(message)
    }

    /// Send `digest`. Blocks until the relay accepts or rejects it.
    pub fn send(&self, digest: &Digest) -> Result<(), NotifyError> {
        let message = self.build_message(digest)?;
        let transport = SmtpTransport::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.username.clone(),
                self.settings.password.clone(),
            ))
            .timeout(Some(SEND_TIMEOUT))
            .build();
        transport.send(&message)?;
        info!(host = %self.settings.host, to = %self.settings.to, "digest sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}
