//! Console messenger for development. Logs messages to tracing output.

use async_trait::async_trait;
use curatia_application::Messenger;
use curatia_core::AppResult;
use tracing::info;

/// Development messenger that logs messages to the console.
#[derive(Clone)]
pub struct ConsoleMessenger;

impl ConsoleMessenger {
    /// Creates a new console messenger.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()> {
        info!(
            recipient = recipient,
            subject = subject,
            "--- MESSAGE (console) ---\nTo: {}\nSubject: {}\n\n{}\n--- END MESSAGE ---",
            recipient,
            subject,
            body
        );

        Ok(())
    }
}
