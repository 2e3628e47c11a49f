//! AppState: shared read-only data passed to components.
//!
//! Only the App event loop writes to it.

use std::path::PathBuf;

use chan_proto::channel::ChannelSnapshot;

use crate::view::{Capability, DisplayContext};
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub snapshot: ChannelSnapshot,
    pub snapshot_path: PathBuf,
    /// Last reload error; cleared by the next successful load.
    pub snapshot_error: Option<String>,
    pub display: DisplayContext,
    pub capability: Capability,
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(
        snapshot: ChannelSnapshot,
        snapshot_path: PathBuf,
        display: DisplayContext,
        capability: Capability,
    ) -> Self {
        Self {
            snapshot,
            snapshot_path,
            snapshot_error: None,
            display,
            capability,
            input_mode: InputMode::Normal,
        }
    }
}
