//! Alert email delivery.
//!
//! The report body is sent as a single plain-text message to one recipient
//! over STARTTLS-upgraded SMTP submission with username/password auth.
//! Mail is only sent after the report file has been written, so a delivery
//! failure never loses the report.

use crate::config::EmailSettings;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error;
use std::fmt;
use tracing::{info, instrument};

/// Anything that can deliver a rendered report.
pub trait SendReport {
    async fn send_report(&self, body: &str) -> Result<(), Box<dyn Error>>;
}

/// [`SendReport`] over authenticated SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    subject: String,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .field("to", &self.to.to_string())
            .field("subject", &self.subject)
            .finish()
    }
}

impl SmtpMailer {
    /// Build the transport and parse both addresses up front so a typo in
    /// the configuration fails the run before any page is fetched.
    pub fn new(settings: &EmailSettings) -> Result<Self, Box<dyn Error>> {
        let from: Mailbox = settings.from.parse()?;
        let to: Mailbox = settings.to.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from,
            to,
            subject: settings.subject.clone(),
        })
    }

    /// Assemble the outgoing message without sending it.
    pub fn build_message(&self, body: &str) -> Result<Message, Box<dyn Error>> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        Ok(message)
    }
}

impl SendReport for SmtpMailer {
    #[instrument(level = "info", skip_all, fields(to = %self.to))]
    async fn send_report(&self, body: &str) -> Result<(), Box<dyn Error>> {
        let message = self.build_message(body)?;
        let response = self.transport.send(message).await?;
        info!(code = %response.code(), "Sent report email");
        Ok(())
    }
}
