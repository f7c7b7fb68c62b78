//! Outbound notifications.
//!
//! The workflow only needs to know whether a message was accepted for a
//! recipient; delivery guarantees belong to the [`Notifier`] implementation.

mod logging;
#[cfg(any(test, feature = "mocks"))]
mod mock;

pub use logging::LoggingNotifier;
#[cfg(any(test, feature = "mocks"))]
pub use mock::MockNotifier;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::repository::Invitation;

pub const INVITATION_TEMPLATE: &str = "invitation";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    #[error("failed to send notification to {recipient}: {reason}")]
    SendFailed { recipient: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub template: String,
    pub payload: serde_json::Value,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Builds the invitation email for `invitation`. The accept link is
/// `{link_base}/{token}`.
pub fn invitation_notification(invitation: &Invitation, link_base: &str) -> Notification {
    let link = format!(
        "{}/{}",
        link_base.trim_end_matches('/'),
        invitation.token.expose_secret()
    );

    Notification {
        recipient: invitation.email.clone(),
        template: INVITATION_TEMPLATE.to_owned(),
        payload: json!({
            "company_name": invitation.company_name,
            "email": invitation.email,
            "link": link,
            "expires_at": invitation.expires_at,
        }),
    }
}
