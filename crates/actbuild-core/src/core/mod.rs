//! # Core Module
//!
//! The fundamental building blocks shared by the resolver and the install workflow.
//!
//! ## Architecture
//!
//! - **Models** ([`models`]) - Build targets, host profiles, the environment snapshot and
//!   the MPI compiler pair
//! - **Flags** ([`flags`]) - The ordered CMake argument list handed to the configure step
//! - **Tools** ([`tools`]) - Invocations of git, CMake and make, plus executable lookup
//!
//! Nothing in this module reads the process environment implicitly; callers capture an
//! [`models::environment::Environment`] once and pass it down.

pub mod flags;
pub mod models;
pub mod tools;
