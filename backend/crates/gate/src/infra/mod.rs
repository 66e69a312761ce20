//! Infrastructure Layer

pub mod memory;
pub mod redis;
