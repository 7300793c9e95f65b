pub mod confirm_dialog;
pub mod help_overlay;
pub mod trash_panel;
