//! Galaxy Workflows API
//!
//! Provides list, create, update, delete and copy operations for Galaxy
//! workflows, plus the display attributes derived for each listed record.

mod client;
mod record;

pub use client::{WorkflowClient, copy_name};
pub use record::{NOT_AVAILABLE, Workflow, derive_description};
