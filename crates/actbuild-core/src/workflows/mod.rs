//! # Workflows Module
//!
//! Top-level entry points that tie the [`crate::engine`] resolver to the external tools.
//!
//! - **Install Workflow** ([`install`]) - Clone, check out, configure and build one branch
//!   of ACT or GROMACS, or only resolve the configuration for a dry run.

pub mod install;
