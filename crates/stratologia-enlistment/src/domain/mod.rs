//! Domain layer: commands, decision rules, and message templates.

pub mod aggregates;
pub mod commands;
pub mod notifications;
