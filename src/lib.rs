pub mod domain;
pub mod drag;
pub mod store;
pub mod ui;
pub mod utils;
