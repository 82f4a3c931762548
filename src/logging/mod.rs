//! Structured logging.

mod format;

pub use format::{AuditEvent, StructuredLogger};
