pub mod common;
pub mod config;
pub mod cycles;
pub mod interrupt;
pub mod locate;
pub mod plan;
