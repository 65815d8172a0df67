pub mod error;

pub mod config;

pub mod policy;
pub mod simulator;
pub mod trace;
