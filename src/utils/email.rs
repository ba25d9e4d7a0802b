use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;
use std::env;

/// A plain-text message ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound mail seam. Implementations send once and report failure as a
/// message; nothing here retries.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), String>;
}

/// SMTP configuration
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    /// Load email configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.zoho.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "465".to_string())
                .parse()
                .map_err(|_| "SMTP_PORT must be a valid number")?,
            smtp_username: env::var("SMTP_USERNAME").map_err(|_| "SMTP_USERNAME is required")?,
            smtp_password: env::var("SMTP_PASSWORD").map_err(|_| "SMTP_PASSWORD is required")?,
            from_email: env::var("SMTP_FROM_EMAIL").map_err(|_| "SMTP_FROM_EMAIL is required")?,
            from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Blog".to_string()),
        })
    }
}

/// Sends mail through an SMTP relay.
pub struct EmailService {
    from_address: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
    pub fn new() -> Result<Self, String> {
        Self::with_config(EmailConfig::from_env()?)
    }

    pub fn with_config(config: EmailConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.smtp_username, config.smtp_password);

        // port 465 means implicit TLS; relay() handles that
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
            .credentials(creds)
            .port(config.smtp_port)
            .build();

        Ok(Self {
            from_address: format!("{} <{}>", config.from_name, config.from_email),
            transport,
        })
    }
}

#[async_trait]
impl MailTransport for EmailService {
    async fn send(&self, email: OutgoingEmail) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| format!("Invalid from address: {}", e))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| format!("Invalid to address: {}", e))?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| format!("Failed to build email: {}", e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {}", e))?;

        Ok(())
    }
}

/// Writes messages to the log instead of sending them. Used when SMTP is not
/// configured.
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), String> {
        info!(
            "mail to={} subject={:?}\n{}",
            email.to, email.subject, email.body
        );
        Ok(())
    }
}
