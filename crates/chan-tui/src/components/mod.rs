pub mod channel_card;
pub mod channel_list;
pub mod close_modal;
pub mod header;
pub mod help_overlay;
