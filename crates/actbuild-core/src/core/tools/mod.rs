//! # Tools Module
//!
//! Thin descriptions of the external programs the install workflow drives.
//!
//! - [`git`] - clone, tracking-branch checkout and pull
//! - [`cmake`] - the configure and build steps and their log files
//! - [`locate`] - `which`-style executable lookup
//! - [`process`] - the [`process::ToolRunner`] seam and its real implementation
//!
//! Builders here only describe an [`process::Invocation`]; running it, and deciding what a
//! non-zero exit means, is left to the caller.

pub mod cmake;
pub mod git;
pub mod locate;
pub mod process;
