pub mod catalog;
pub mod civilization;
pub mod colony;
pub mod config;
pub mod errors;
pub mod galaxy;
pub mod ids;
pub mod resources;
pub mod ship;
pub mod syslog;
pub mod universe;
