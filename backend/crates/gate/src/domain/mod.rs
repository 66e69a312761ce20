//! Domain Layer

pub mod category;
pub mod decision;
pub mod key;
pub mod repository;
