//! Nullable mailer: records outgoing access-code emails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use village_mail::{MailError, Mailer};
use village_types::{AccessCode, Email};

/// An in-memory mailer for testing.
///
/// Every successful send is recorded; `failing()` makes every send fail.
pub struct NullMailer {
    sent: Mutex<Vec<(Email, AccessCode)>>,
    fail: AtomicBool,
}

impl NullMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// A mailer whose provider always rejects the message.
    pub fn failing() -> Self {
        let mailer = Self::new();
        mailer.set_failing(true);
        mailer
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages delivered so far, oldest first.
    pub fn sent(&self) -> Vec<(Email, AccessCode)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for NullMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for NullMailer {
    async fn send_access_code_email(
        &self,
        to: &Email,
        code: &AccessCode,
    ) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Delivery("null mailer set to fail".to_string()));
        }
        self.sent.lock().unwrap().push((to.clone(), code.clone()));
        Ok(())
    }
}
