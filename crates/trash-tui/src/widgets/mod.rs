pub mod command_input;
pub mod context_menu;
pub mod details;
pub mod list_cursor;
pub mod pane_chrome;
pub mod status_bar;
pub mod toast;
