//! Shared relay state and the flush broadcast channel.

mod broadcast;
mod state;

pub use broadcast::FlushBroadcaster;
pub use state::RelayState;

use linesight_types::LinesightError;

pub fn relay_error(message: impl Into<String>) -> LinesightError {
    LinesightError::Relay(message.into())
}
