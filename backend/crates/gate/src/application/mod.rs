//! Application Layer

pub mod admit;
pub mod config;
