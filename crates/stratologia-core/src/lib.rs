//! Stratologia Core — shared domain model and ports.
//!
//! This crate defines the records, closed enums, and the traits that the
//! enlistment context depends on. It contains no infrastructure code:
//! storage and mail transport live behind the ports declared here.

pub mod clock;
pub mod error;
pub mod model;
pub mod notify;
pub mod repository;
