//! Route modules.

pub mod applications;
pub mod debug;
pub mod health;
