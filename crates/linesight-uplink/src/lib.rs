//! Drone-side uplink: frame acquisition and the relay upload loop.

mod client;
mod runner;
mod source;

pub use client::UplinkClient;
pub use runner::UplinkRunner;
pub use source::{CapturedFrame, DirectorySource, FrameSource, SyntheticSource};

use linesight_types::LinesightError;

pub fn uplink_error(message: impl Into<String>) -> LinesightError {
    LinesightError::Uplink(message.into())
}
