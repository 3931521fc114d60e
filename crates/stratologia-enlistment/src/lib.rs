//! Stratologia — enlistment application workflow.
//!
//! Responsible for resolving citizens by national ID, accepting new
//! deferment/enlistment applications, listing them, and recording
//! approve/reject decisions with a mail notification on approval.

pub mod application;
pub mod domain;
