//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cookie management
//! - Client identification (IP derivation behind proxies)
//! - Key-value store access with bounded deadlines

pub mod client;
pub mod cookie;
pub mod store;
