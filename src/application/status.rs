//! One-way progress/log channel between the batch worker and its
//! controlling context. Emitting never blocks the worker.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

#[derive(Clone)]
pub struct StatusSink {
    sender: Option<UnboundedSender<String>>,
}

impl StatusSink {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Sink that only traces, for tests and library use
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn emit(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.forward(message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.forward(message);
    }

    fn forward(&self, message: String) {
        if let Some(sender) = &self.sender {
            // A closed receiver only means nobody is watching anymore
            let _ = sender.send(message);
        }
    }
}
