pub mod filter_input;
pub mod labeled_line;
pub mod modal;
pub mod pane_chrome;
pub mod ratio_bar;
pub mod scrollable_list;
pub mod status_bar;
pub mod status_dot;
pub mod toast;
