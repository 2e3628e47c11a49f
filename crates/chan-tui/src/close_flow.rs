//! Close-channel flow: the content of a card's close modal.
//!
//! # Steps
//! ```text
//!  Confirm: pick force / fee target, Enter submits
//!  Submitting: request handed to the closer, waiting for the result
//!  Failed: closer refused; Enter goes back to Confirm, Esc dismisses
//! ```
//! A successful close does not have a step of its own: the card drops the
//! whole flow and its modal returns to closed.

use thiserror::Error;
use tracing::info;

/// Confirmation targets offered for the closing transaction fee.
pub const TARGET_CONFIRMATIONS: [u16; 6] = [1, 3, 6, 12, 24, 144];

const DEFAULT_TARGET_IDX: usize = 2;

/// Everything the closer needs to close one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseRequest {
    pub channel_id: String,
    pub channel_name: String,
    pub force: bool,
    pub target_confirmations: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReceipt {
    pub channel_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloseError {
    #[error("channel id is empty")]
    MissingChannelId,

    #[error("close rejected: {0}")]
    Rejected(String),
}

/// The close-channel collaborator. Implementations own the actual
/// transaction lifecycle; the dashboard only hands over the request.
pub trait ChannelCloser {
    fn close(&self, request: &CloseRequest) -> Result<CloseReceipt, CloseError>;
}

/// Records close requests in the log without touching a node.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCloser;

impl ChannelCloser for LoggingCloser {
    fn close(&self, request: &CloseRequest) -> Result<CloseReceipt, CloseError> {
        if request.channel_id.trim().is_empty() {
            return Err(CloseError::MissingChannelId);
        }
        let kind = if request.force { "force" } else { "cooperative" };
        info!(
            channel_id = %request.channel_id,
            channel_name = %request.channel_name,
            target_confirmations = request.target_confirmations,
            "{} close requested",
            kind
        );
        Ok(CloseReceipt {
            channel_id: request.channel_id.clone(),
            message: format!("{} close requested for {}", kind, request.channel_name),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    Confirm,
    Submitting,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseChannelFlow {
    channel_id: String,
    channel_name: String,
    force: bool,
    target_idx: usize,
    step: FlowStep,
}

impl CloseChannelFlow {
    pub fn new(channel_id: impl Into<String>, channel_name: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
            force: false,
            target_idx: DEFAULT_TARGET_IDX,
            step: FlowStep::Confirm,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn target_confirmations(&self) -> u16 {
        TARGET_CONFIRMATIONS[self.target_idx]
    }

    pub fn step(&self) -> &FlowStep {
        &self.step
    }

    pub fn toggle_force(&mut self) {
        if self.step == FlowStep::Confirm {
            self.force = !self.force;
        }
    }

    pub fn next_target(&mut self) {
        if self.step == FlowStep::Confirm {
            self.target_idx = (self.target_idx + 1).min(TARGET_CONFIRMATIONS.len() - 1);
        }
    }

    pub fn prev_target(&mut self) {
        if self.step == FlowStep::Confirm {
            self.target_idx = self.target_idx.saturating_sub(1);
        }
    }

    pub fn request(&self) -> CloseRequest {
        CloseRequest {
            channel_id: self.channel_id.clone(),
            channel_name: self.channel_name.clone(),
            force: self.force,
            target_confirmations: self.target_confirmations(),
        }
    }

    /// Move to `Submitting` and hand out the request. Only valid from
    /// `Confirm`; a second Enter while submitting yields nothing.
    pub fn submit(&mut self) -> Option<CloseRequest> {
        if self.step != FlowStep::Confirm {
            return None;
        }
        self.step = FlowStep::Submitting;
        Some(self.request())
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.step = FlowStep::Failed(message.into());
    }

    /// Back to `Confirm` after a failure, keeping the chosen options.
    pub fn retry(&mut self) {
        if matches!(self.step, FlowStep::Failed(_)) {
            self.step = FlowStep::Confirm;
        }
    }
}
