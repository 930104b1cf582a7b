use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use jobsignal_common::JobRecord;
use resend_client::{ResendClient, SendEmailRequest};

/// Delivers the end-of-run summary for newly appended jobs. Tests implement
/// it with a recording stub.
#[async_trait]
pub trait SummaryNotifier: Send + Sync {
    async fn send_summary(&self, jobs: &[JobRecord]) -> Result<()>;
}

pub struct EmailNotifier {
    client: ResendClient,
    from: String,
    recipient: String,
    subject: String,
}

impl EmailNotifier {
    pub fn new(client: ResendClient, from: &str, recipient: &str, subject: &str) -> Self {
        Self {
            client,
            from: from.to_string(),
            recipient: recipient.to_string(),
            subject: subject.to_string(),
        }
    }
}

#[async_trait]
impl SummaryNotifier for EmailNotifier {
    async fn send_summary(&self, jobs: &[JobRecord]) -> Result<()> {
        let request = SendEmailRequest {
            from: self.from.clone(),
            to: vec![self.recipient.clone()],
            subject: self.subject.clone(),
            text: summary_body(jobs),
        };
        let message_id = self
            .client
            .send(&request)
            .await
            .context("sending summary e-mail")?;
        info!(%message_id, jobs = jobs.len(), "Summary e-mail sent");
        Ok(())
    }
}

/// Plain-text body: a count line, then one numbered block per job.
pub fn summary_body(jobs: &[JobRecord]) -> String {
    let mut lines = vec![format!("Total new relevant jobs: {}", jobs.len()), String::new()];
    for (idx, job) in jobs.iter().enumerate() {
        lines.push(format!(
            "{}. {} at {}\n   Date: {}\n   Sender: {}\n   Location: {}\n   Experience: {}\n   Skills: {}\n   Contact Email: {}\n",
            idx + 1,
            job.role,
            job.company,
            job.date,
            job.sender,
            job.location,
            job.experience,
            job.skills,
            job.contact_email,
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(role: &str, company: &str) -> JobRecord {
        JobRecord {
            date: "2026-01-02 09:00".to_string(),
            sender: "Alice".to_string(),
            company: company.to_string(),
            role: role.to_string(),
            location: "Remote".to_string(),
            experience: "3y".to_string(),
            skills: "Playwright".to_string(),
            contact_email: "jobs@acme.test".to_string(),
        }
    }

    #[test]
    fn body_opens_with_the_count() {
        let body = summary_body(&[job("QA Engineer", "Acme"), job("SDET", "Globex")]);
        assert!(body.starts_with("Total new relevant jobs: 2\n"));
    }

    #[test]
    fn body_numbers_each_job_block() {
        let body = summary_body(&[job("QA Engineer", "Acme"), job("SDET", "Globex")]);
        assert!(body.contains("1. QA Engineer at Acme\n"));
        assert!(body.contains("2. SDET at Globex\n"));
    }

    #[test]
    fn body_carries_sender_and_contact_lines() {
        let body = summary_body(&[job("QA Engineer", "Acme")]);
        assert!(body.contains("   Sender: Alice\n"));
        assert!(body.contains("   Contact Email: jobs@acme.test\n"));
    }
}
