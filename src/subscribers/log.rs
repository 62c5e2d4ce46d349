//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [launched] service=cloudhorn
//! [sent] service=cloudhorn
//! [failed] service=daisycast
//! [cancelled] dispatch stopped by operator
//! [completed] horizon elapsed; run closed
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let label = e.kind.as_label();
        match e.kind {
            EventKind::TaskLaunched | EventKind::TaskSent | EventKind::TaskFailed => {
                if let Some(service) = &e.service {
                    println!("[{label}] service={service}");
                }
            }
            EventKind::RunCancelled | EventKind::RunCompleted => {
                match &e.message {
                    Some(message) => println!("[{label}] {message}"),
                    None => println!("[{label}]"),
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
