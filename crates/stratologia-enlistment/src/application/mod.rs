//! Application layer: handlers that orchestrate the domain against the ports.

pub mod citizen_resolver;
pub mod command_handlers;
pub mod dispatcher;
pub mod query_handlers;
