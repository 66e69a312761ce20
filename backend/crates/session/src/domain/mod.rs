//! Domain Layer

pub mod token;
