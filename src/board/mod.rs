//! Kanban board for one sprint.
//!
//! A board partitions a sprint's tasks into `To Do`, `In Progress`, and
//! `Done` columns by status. Dragging a card within a column only reorders
//! it locally; dragging it into another column changes its status, which is
//! persisted through the [`ports::TaskGateway`] and rolled back on failure.
//!
//! - Column state and notifications in [`domain`]
//! - The gateway contract in [`ports`]
//! - A gateway over the tracker service in [`adapters`]
//! - The interactive session in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
