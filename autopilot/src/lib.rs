pub mod benchmark;
pub mod config;
pub mod pilot;
pub mod runner;
pub mod util;
