//! # actbuild Core Library
//!
//! Host-aware build orchestration for the ACT force-field toolkit and the GROMACS
//! code base it is built on.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Plain data models (`BuildTarget`, `Environment`,
//!   `HostTable`, `CompilerPair`), the CMake flag list, and thin wrappers around the
//!   external tools (git, CMake, make) and executable lookup.
//!
//! - **[`engine`]: The Logic Core.** The validated `BuildRequest`, the error types, progress
//!   reporting and the resolver that turns a request plus an environment snapshot into a
//!   complete `BuildConfiguration`.
//!
//! - **[`workflows`]: The Public API.** Runs the full clone, checkout, configure and build
//!   sequence against an injected tool runner.

pub mod core;
pub mod engine;
pub mod workflows;
