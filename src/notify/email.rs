// src/notify/email.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Message, Tokio1Executor};

use super::digest::{self, Digest};
use super::Notifier;
use crate::config::MailConfig;
use crate::record::MenuRecord;

/// Sends the digest over SMTP (STARTTLS, port 587).
pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSender {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("invalid SMTP host {}", config.smtp_host))?
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }

    /// Build the `multipart/related` message for a digest.
    pub fn build_message(&self, digest: &Digest<'_>) -> Result<Message> {
        build_message(self.from.clone(), self.to.clone(), digest)
    }
}

pub fn build_message(from: Mailbox, to: Mailbox, digest: &Digest<'_>) -> Result<Message> {
    let mut related = MultiPart::related().singlepart(
        SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(digest.html.clone()),
    );

    for inline in &digest.inline_images {
        let content_type = ContentType::parse(&inline.image.content_type)
            .or_else(|_| ContentType::parse("image/jpeg"))
            .context("image content type")?;
        related = related.singlepart(
            Attachment::new_inline(inline.content_id.clone())
                .body(inline.image.bytes.clone(), content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(digest.subject.clone())
        .multipart(related)
        .context("build email")
}

#[async_trait]
impl Notifier for EmailSender {
    async fn send_digest(&self, records: &[MenuRecord], today: NaiveDate) -> Result<()> {
        let digest = digest::compose(records, today);
        let msg = self.build_message(&digest)?;
        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
