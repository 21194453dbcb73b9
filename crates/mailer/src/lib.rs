//! Outbound email via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport, built once at startup
//! and reused for every send. Configuration comes from environment variables;
//! if `EMAIL_FROM` is not set, [`MailerConfig::from_env`] returns `None` and
//! the lifecycle layer logs-and-skips every dispatch.

use std::path::PathBuf;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Display name used in the RFC 5322 "From" header.
const FROM_DISPLAY_NAME: &str = "Geotoy";

/// Default SMTP relay host.
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// An attachment file could not be read from disk.
    #[error("Attachment read error: {0}")]
    Io(#[from] std::io::Error),
}

/// An on-disk file to attach to an outgoing message.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    /// Filename shown to the recipient.
    pub filename: String,
    /// Path of the file on local disk.
    pub path: PathBuf,
}

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Sender address, also used as the SMTP username.
    pub email_from: String,
    /// SMTP password or app password.
    pub email_password: Option<String>,
    /// SMTP relay hostname.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
}

impl MailerConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `EMAIL_FROM` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable         | Required | Default          |
    /// |------------------|----------|------------------|
    /// | `EMAIL_FROM`     | yes      | —                |
    /// | `EMAIL_PASSWORD` | no       | —                |
    /// | `SMTP_HOST`      | no       | `smtp.gmail.com` |
    /// | `SMTP_PORT`      | no       | `587`            |
    pub fn from_env() -> Option<Self> {
        let email_from = std::env::var("EMAIL_FROM").ok()?;
        Some(Self {
            email_from,
            email_password: std::env::var("EMAIL_PASSWORD").ok(),
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
        })
    }
}

/// Process-wide SMTP mailer. The transport is constructed once and shared.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build the STARTTLS transport for the given configuration.
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let from: Mailbox =
            format!("\"{FROM_DISPLAY_NAME}\" <{}>", config.email_from).parse()?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let Some(password) = config.email_password {
            builder = builder.credentials(Credentials::new(config.email_from, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Send an HTML message, optionally with file attachments read from disk.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        attachments: &[EmailAttachment],
    ) -> Result<(), MailerError> {
        let mut body = MultiPart::mixed().singlepart(SinglePart::html(html.to_string()));

        for attachment in attachments {
            let content = tokio::fs::read(&attachment.path).await?;
            let content_type = ContentType::parse(mime_for(&attachment.filename))
                .map_err(|e| MailerError::Build(e.to_string()))?;
            body = body.singlepart(
                Attachment::new(attachment.filename.clone()).body(content, content_type),
            );
        }

        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .multipart(body)
            .map_err(|e| MailerError::Build(e.to_string()))?;

        self.transport.send(email).await?;

        tracing::info!(to, subject, "Email sent");
        Ok(())
    }
}

/// MIME type by filename extension. Uploads are filtered to these types
/// plus the invoice PDF before they ever reach the mailer.
fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_email_from() {
        std::env::remove_var("EMAIL_FROM");
        assert!(MailerConfig::from_env().is_none());
    }

    #[test]
    fn mime_for_known_extensions() {
        assert_eq!(mime_for("nota-fiscal.pdf"), "application/pdf");
        assert_eq!(mime_for("foto.JPG"), "image/jpeg");
        assert_eq!(mime_for("arte.jpeg"), "image/jpeg");
        assert_eq!(mime_for("render.png"), "image/png");
        assert_eq!(mime_for("arquivo.bin"), "application/octet-stream");
    }

    #[test]
    fn mailer_error_display_build() {
        let err = MailerError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn mailer_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailerError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
