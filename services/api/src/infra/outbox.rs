//! Background dispatcher delivering outbox events as email.
//!
//! Handlers write events transactionally with their primary data; this
//! loop owns delivery. Failures retry with growing backoff up to
//! `OUTBOX_MAX_ATTEMPTS`, then the event is parked permanently. A dead
//! mail relay therefore never fails a user request and never loses the
//! primary write.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, warn};

use crate::domain::repository::{Mailer, OutboxRepository};
use crate::domain::types::{OUTBOX_MAX_ATTEMPTS, OutboxEvent, PendingOutboxEvent};
use crate::error::ApiError;

const POLL_INTERVAL: StdDuration = StdDuration::from_secs(5);
const BATCH_SIZE: u64 = 20;

struct RenderedMail {
    to: String,
    subject: String,
    body: String,
}

fn render(event: &OutboxEvent) -> Option<RenderedMail> {
    let to = event.payload["email"].as_str()?.to_owned();
    match event.kind.as_str() {
        "otp_issued" => {
            let code = event.payload["code"].as_str()?;
            Some(RenderedMail {
                to,
                subject: "Your OTP for Password Reset".to_owned(),
                body: format!("Your OTP is {code}. It expires in 5 minutes."),
            })
        }
        "password_reset" => {
            let full_name = event.payload["fullName"].as_str()?;
            Some(RenderedMail {
                to,
                subject: "Password Reset Confirmation".to_owned(),
                body: format!(
                    "Hello {full_name},\n\n\
                     You have successfully reset your password for your TeamSync account.\n\
                     If you did not perform this action, please contact support immediately.\n\n\
                     Best regards,\nTeamSync"
                ),
            })
        }
        _ => None,
    }
}

/// Delay before retry number `attempts + 1`: 1m, 2m, 4m, 8m, capped.
fn backoff_after(attempts: i32) -> Duration {
    Duration::seconds(30 << attempts.clamp(1, 4))
}

pub struct OutboxDispatcher<O, M>
where
    O: OutboxRepository,
    M: Mailer,
{
    pub outbox: O,
    pub mailer: M,
}

impl<O, M> OutboxDispatcher<O, M>
where
    O: OutboxRepository,
    M: Mailer,
{
    pub async fn run(self) {
        loop {
            if let Err(e) = self.tick(Utc::now()).await {
                error!(error = %e, "outbox tick failed");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Deliver one batch of due events. Returns how many were delivered.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<usize, ApiError> {
        let due = self.outbox.fetch_due(BATCH_SIZE, now).await?;
        let mut delivered = 0;
        for pending in due {
            match self.deliver(&pending).await {
                Ok(()) => {
                    self.outbox.mark_processed(pending.event.id).await?;
                    delivered += 1;
                }
                Err(e) => {
                    let attempts = pending.attempts + 1;
                    let permanent = attempts >= OUTBOX_MAX_ATTEMPTS;
                    warn!(
                        event_id = %pending.event.id,
                        kind = %pending.event.kind,
                        attempts,
                        permanent,
                        error = %e,
                        "outbox delivery failed"
                    );
                    self.outbox
                        .mark_failed(
                            pending.event.id,
                            attempts,
                            &e.to_string(),
                            now + backoff_after(attempts),
                            permanent,
                        )
                        .await?;
                }
            }
        }
        Ok(delivered)
    }

    async fn deliver(&self, pending: &PendingOutboxEvent) -> Result<(), anyhow::Error> {
        let Some(mail) = render(&pending.event) else {
            anyhow::bail!("unrenderable outbox event kind {:?}", pending.event.kind);
        };
        self.mailer.send(&mail.to, &mail.subject, &mail.body).await
    }
}
