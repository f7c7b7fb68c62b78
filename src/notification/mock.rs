#![allow(clippy::significant_drop_tightening)]

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{Notification, Notifier, NotifyError};

/// Records every accepted notification. Recipients registered with
/// [`MockNotifier::fail_for`] are rejected.
#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    attempts: Arc<RwLock<Vec<String>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(recipient.to_owned());
        }
    }

    /// Successfully sent notifications, in order.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.read().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// Every recipient a send was attempted for, including failures.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: Notification) -> Result<(), NotifyError> {
        let recipient = notification.recipient.clone();

        self.attempts
            .write()
            .map_err(|_| lock_error(&recipient))?
            .push(recipient.clone());

        if self
            .failing
            .read()
            .map_err(|_| lock_error(&recipient))?
            .contains(&recipient)
        {
            return Err(NotifyError::SendFailed {
                recipient,
                reason: "rejected by mock".to_owned(),
            });
        }

        self.sent
            .write()
            .map_err(|_| lock_error(&recipient))?
            .push(notification);
        Ok(())
    }
}

fn lock_error(recipient: &str) -> NotifyError {
    NotifyError::SendFailed {
        recipient: recipient.to_owned(),
        reason: "lock poisoned".to_owned(),
    }
}
