//! Overlay adapters.

mod local;
mod recording;

pub use local::LocalOverlay;
pub use recording::{Operation, RecordingOverlay};
