//! Fire-and-forget mail to survey creators.
//!
//! Mail is queued by request handlers and delivered by a single background
//! task, so a slow or failing transport never delays or fails a request.
//! Delivery failures are only logged.

use std::fmt::Write;

use aws_sdk_sesv2::{
    error::DisplayErrorContext,
    primitives::Blob,
    types::{Destination, EmailContent, RawMessage},
    Client as SesClient,
};
use log::{debug, error, info, warn};
use rocket::tokio::{self, sync::mpsc};
use thiserror::Error;

use crate::model::{response::ResponseRecord, survey::Survey};

/// A plain-text mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    /// Tell the creator where their new survey lives.
    pub fn survey_created(survey: &Survey, hostname: &str) -> Self {
        Self {
            to: survey.creator_email.clone(),
            subject: format!("Survey [{}] created", survey.title),
            body: format!(
                "{},\n\n\
                 The survey titled '{}' has been created and it can be shared \
                 with anyone using the url {}\n\n\
                 You can see the results and close the survey with the admin password \
                 you chose, from the admin url {}\n\n\
                 Thank you.",
                survey.creator_name,
                survey.title,
                survey.vote_link(hostname),
                survey.admin_link(hostname),
            ),
        }
    }

    /// Forward a single response to the creator, in question order.
    pub fn new_response(survey: &Survey, response: &ResponseRecord) -> Self {
        let mut body = format!("New response to the survey titled [{}]\n", survey.title);
        for (index, values) in response
            .ordered_answers(survey.question_count)
            .into_iter()
            .enumerate()
        {
            // Writing to a `String` cannot fail.
            let _ = write!(body, "\nquestion{}: {}", index + 1, values.join("\t"));
        }

        Self {
            to: survey.creator_email.clone(),
            subject: format!("[{}] New response", survey.title),
            body,
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to build message: {0}")]
    Build(String),
    #[error("Failed to send message: {0}")]
    Send(String),
}

/// Something that can actually deliver mail.
#[rocket::async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, mail: &Mail) -> Result<(), MailError>;
}

/// Delivery through Amazon SES.
pub struct SesTransport {
    client: SesClient,
    from: String,
}

impl SesTransport {
    pub fn new(client: SesClient, from: String) -> Self {
        Self { client, from }
    }
}

/// A plain-text RFC 5322 message.
fn raw_message(from: &str, mail: &Mail) -> String {
    format!(
        "From: {from}\r\nTo: {}\r\nSubject: {}\r\n\
         Content-Type: text/plain; charset=UTF-8\r\n\r\n{}",
        mail.to,
        mail.subject,
        mail.body.replace('\n', "\r\n"),
    )
}

#[rocket::async_trait]
impl MailTransport for SesTransport {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        let raw = RawMessage::builder()
            .data(Blob::new(raw_message(&self.from, mail)))
            .build()
            .map_err(|err| MailError::Build(err.to_string()))?;

        self.client
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(&mail.to).build())
            .content(EmailContent::builder().raw(raw).build())
            .send()
            .await
            .map_err(|err| MailError::Send(DisplayErrorContext(err).to_string()))?;
        Ok(())
    }
}

/// Handle on the mail queue. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Mailer {
    queue: mpsc::UnboundedSender<Mail>,
}

impl Mailer {
    /// Start the delivery task. Must be called from within the async runtime.
    pub fn spawn(transport: impl MailTransport) -> Self {
        let (queue, mut pending) = mpsc::unbounded_channel::<Mail>();
        tokio::spawn(async move {
            while let Some(mail) = pending.recv().await {
                match transport.send(&mail).await {
                    Ok(()) => info!("Sent mail '{}' to {}", mail.subject, mail.to),
                    Err(err) => error!("Mail '{}' to {} failed: {err}", mail.subject, mail.to),
                }
            }
            debug!("Mail queue closed");
        });
        Self { queue }
    }

    /// Queue a mail for delivery. Never blocks and never fails.
    pub fn dispatch(&self, mail: Mail) {
        if mail.to.is_empty() {
            warn!("Not sending mail '{}': no recipient", mail.subject);
            return;
        }
        if let Err(err) = self.queue.send(mail) {
            error!("Mail queue is closed, dropping mail to {}", err.0.to);
        }
    }
}

#[cfg(test)]
pub use outbox::Outbox;
