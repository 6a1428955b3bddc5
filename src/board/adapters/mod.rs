//! Adapter implementations for board ports.

mod service;

pub use service::ServiceTaskGateway;
