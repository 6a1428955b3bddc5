//! Sprintboard: multi-tenant project, sprint, and task tracking.
//!
//! Users own projects, plan time-boxed sprints inside them, and move tasks
//! across a three-column kanban board. Every read and write is scoped to the
//! identity carried by an explicit request context.
//!
//! # Architecture
//!
//! Sprintboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`tracker`]: Ownership-scoped CRUD with cascading deletes
//! - [`board`]: Column state, moves, and rollback for one sprint
//! - [`config`]: File and environment configuration
//! - [`telemetry`]: Structured logging setup

pub mod board;
pub mod config;
pub mod telemetry;
pub mod tracker;
