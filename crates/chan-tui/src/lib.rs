//! chandash: terminal dashboard for the channels of a Lightning node.
//!
//! The binary wires these modules together; tests drive them directly.

pub mod action;
pub mod app;
pub mod app_state;
pub mod close_flow;
pub mod component;
pub mod components;
pub mod selection;
pub mod theme;
pub mod view;
pub mod watcher;
pub mod widgets;
