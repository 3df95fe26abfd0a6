//! # Core Models Module
//!
//! Transient, single-invocation values describing what is built and where.
//!
//! ## Key Components
//!
//! - [`target`] - Which project (ACT or GROMACS) a branch selects, and the precision mode
//! - [`environment`] - Snapshot of the environment variables the resolver consults
//! - [`host`] - The ordered host profile table and its matched result
//! - [`toolchain`] - The MPI-enabled C/C++ compiler pair

pub mod environment;
pub mod host;
pub mod target;
pub mod toolchain;
