//! # Engine Module
//!
//! Turns a validated [`config::BuildRequest`] and an environment snapshot into a complete
//! [`resolver::BuildConfiguration`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - The build request, its builder and the tool-failure policy
//! - **Resolution** ([`resolver`]) - Host matching, compiler discovery and CMake flag composition
//! - **Progress Monitoring** ([`progress`]) - Phase events for front ends
//! - **Error Handling** ([`error`]) - Precondition failures and delegated tool failures
//!
//! Resolution is a strict chain of fatal gates: an unset `HOME`, an unknown host or missing
//! MPI compilers stop it before any directory is created or any tool is run.

pub mod config;
pub mod error;
pub mod progress;
pub mod resolver;
