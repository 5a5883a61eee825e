//! Interactive menu options.
//!
//! Each command name is matched verbatim by the interactive app, so names must be unique.
pub type Menu = (&'static str, &'static [&'static str]);

// Command aliases. Keep this list in alphabetical order.
pub mod commands {
    pub const ADD_PROFILE: &str = "Add profile";
    pub const CHECK_INVENTORY: &str = "Check inventory";
    pub const EXIT: &str = "Exit";
    pub const REFRESH: &str = "Refresh";
    pub const SELECT_PROFILE: &str = "Select profile";
    pub const SHOW_ORDERS: &str = "Show orders";
    pub const WITHDRAW_STOCK: &str = "Withdraw stock";
}

pub use commands::*;

pub const TOP_MENU: [&str; 7] =
    [SHOW_ORDERS, REFRESH, CHECK_INVENTORY, WITHDRAW_STOCK, SELECT_PROFILE, ADD_PROFILE, EXIT];

pub fn top_menu() -> &'static Menu {
    &("Orders", &TOP_MENU)
}
