//! Ownership-scoped project, sprint, and task tracking.
//!
//! A project owns sprints and a sprint owns tasks. Every read and mutation
//! is restricted to the identity carried by the caller's request context;
//! records owned by anyone else are indistinguishable from missing ones.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
