//! Sink implementations

pub mod console;
pub mod file;
pub mod rotation;

pub use console::{ConsoleSink, MemoryStream};
pub use file::{FileSink, SinkState};
pub use rotation::{backup_path, RotationPolicy};
