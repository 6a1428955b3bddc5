//! Port contracts for sprint boards.

pub mod gateway;

pub use gateway::{TaskGateway, TaskGatewayError, TaskGatewayResult, TaskStatusChange};

#[cfg(test)]
pub use gateway::MockTaskGateway;
