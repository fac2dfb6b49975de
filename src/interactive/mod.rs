//! Interactive mode: menus, prompts and the issue wizard

pub mod creator;
pub mod menu;
mod prompts;

pub use menu::{automation_menu, main_menu, MenuAction};
pub use prompts::Prompter;
