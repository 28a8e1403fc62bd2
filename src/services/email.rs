// src/services/email.rs
//! Transactional email via AWS SESv2.
//!
//! Only best-effort product mail (the signup welcome message) goes through
//! here. Send failures are logged and never surfaced to API callers.

use aws_config::BehaviorVersion;
use aws_sdk_sesv2::config::{Credentials, Region};
use aws_sdk_sesv2::types::{Body as SesBody, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email credentials not configured")]
    NotConfigured,

    #[error("SES operation failed: {0}")]
    SesError(String),
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub from_address: String,
}

#[derive(Debug)]
pub struct EmailService {
    config: Option<EmailConfig>,
}

impl EmailService {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self { config }
    }

    async fn get_client(&self) -> Result<(SesClient, &EmailConfig), EmailError> {
        let config = self.config.as_ref().ok_or(EmailError::NotConfigured)?;

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "env",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Ok((SesClient::new(&aws_config), config))
    }

    pub async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        let (client, config) = self.get_client().await?;

        let destination = Destination::builder().to_addresses(to).build();

        let subject_content = Content::builder()
            .data(subject)
            .charset("UTF-8")
            .build()
            .map_err(|e| EmailError::SesError(format!("Failed to build subject: {}", e)))?;

        let body_content = Content::builder()
            .data(html)
            .charset("UTF-8")
            .build()
            .map_err(|e| EmailError::SesError(format!("Failed to build body: {}", e)))?;

        let ses_body = SesBody::builder().html(body_content).build();

        let message = Message::builder()
            .subject(subject_content)
            .body(ses_body)
            .build();

        let email_content = EmailContent::builder().simple(message).build();

        client
            .send_email()
            .from_email_address(&config.from_address)
            .destination(destination)
            .content(email_content)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send email via SES");
                EmailError::SesError(format!("Send failed: {}", e))
            })?;

        info!("Email sent via SES");

        Ok(())
    }

    /// Welcome email sent after signup. Best effort only.
    pub async fn send_welcome_email(&self, email: &str, name: &str) {
        let subject = "Welcome to SignNova!";
        let html = format!(
            "<h1>Welcome to SignNova, {}!</h1>\
             <p>Thank you for joining our sign language learning community.</p>",
            name
        );

        if let Err(e) = self.send_email(email, subject, &html).await {
            // Not critical for signup; a missing SES config lands here too
            error!(error = %e, "Welcome email not sent");
        }
    }
}
