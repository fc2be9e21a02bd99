//! Galaxy Workflows
//!
//! A client for the Galaxy workflows API: list, create, update, delete and
//! copy workflows, with display attributes derived for the current session.

pub mod cli;
pub mod client;
pub mod error;
pub mod session;
pub mod workflows;

// Re-exports for convenience
pub use client::{Auth, AuthType, GalaxyClient};
pub use error::RequestError;
pub use session::{Identity, Session};
pub use workflows::{Workflow, WorkflowClient};
