pub mod auth;
pub mod funds;
pub mod saved;
pub mod setup;
pub mod shell;
pub mod ui;
