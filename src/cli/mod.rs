pub mod menu;
pub mod setup;
pub mod ui;
pub mod views;
