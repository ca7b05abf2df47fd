pub mod actions;
pub mod list;
pub mod menu;
pub mod refresh;
