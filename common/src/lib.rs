pub mod config;
pub mod maze;
pub mod render;
pub mod time;
