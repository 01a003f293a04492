pub mod config;
pub mod path;
