//! Shared fixtures for service tests.

use uuid::Uuid;

use carehub_auth::{Authority, CallerIdentity};
use carehub_core::types::Locale;

use crate::context::{RequestContext, RequestMeta};

pub(crate) fn meta() -> RequestMeta {
    RequestMeta::new(Locale::default(), "10.0.0.1".into(), Some("test".into()))
}

/// A caller holding `authorities`, scoped to `hospital` when given.
pub(crate) fn ctx(authorities: &[Authority], hospital: Option<Uuid>) -> RequestContext {
    let mut ctx = RequestContext::new(CallerIdentity::for_testing(authorities), meta());
    ctx.hospital_id = hospital;
    ctx
}

/// Mailer that keeps every message it is handed.
#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    pub(crate) sent: std::sync::Mutex<Vec<crate::mail::MailMessage>>,
}

impl RecordingMailer {
    pub(crate) fn messages(&self) -> Vec<crate::mail::MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl crate::mail::Mailer for RecordingMailer {
    async fn send(
        &self,
        message: &crate::mail::MailMessage,
    ) -> carehub_core::result::AppResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Mailer whose relay is always down.
#[derive(Debug, Default)]
pub(crate) struct FailingMailer;

#[async_trait::async_trait]
impl crate::mail::Mailer for FailingMailer {
    async fn send(&self, _: &crate::mail::MailMessage) -> carehub_core::result::AppResult<()> {
        Err(carehub_core::error::AppError::external_service("Mail relay unreachable"))
    }
}
