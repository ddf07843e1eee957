//! Database models and DTOs for the risk register.

pub mod risk;
