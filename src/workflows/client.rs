//! Workflow client
//!
//! Maps each workflow operation onto one request against `api/workflows`:
//!
//! | Operation | Request |
//! |---|---|
//! | list | `GET api/workflows` |
//! | create | `POST api/workflows` with `{"workflow": draft}` |
//! | update | `PUT api/workflows/{id}` |
//! | delete | `DELETE api/workflows/{id}` |
//! | copy | `GET api/workflows/{id}/download`, then create |

use super::Workflow;
use crate::client::GalaxyClient;
use crate::error::RequestError;
use crate::session::Identity;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

const WORKFLOWS_PATH: [&str; 2] = ["api", "workflows"];

#[derive(Serialize)]
struct CreateRequest<'a, T: ?Sized> {
    workflow: &'a T,
}

/// Client for the Galaxy workflows API.
///
/// Holds no state between calls; clones share the underlying HTTP client and
/// can run operations concurrently.
///
/// # Example
/// ```no_run
/// use galaxy_workflows::client::{Auth, GalaxyClient};
/// use galaxy_workflows::session::Session;
/// use galaxy_workflows::workflows::WorkflowClient;
/// use std::sync::Arc;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = GalaxyClient::try_new(Url::parse("http://localhost:8080/")?, Auth::None)?;
/// let workflows = WorkflowClient::new(client, Arc::new(Session::new("alice")));
///
/// for workflow in workflows.list().await? {
///     println!("{} - {}", workflow.name, workflow.description);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WorkflowClient {
    client: GalaxyClient,
    identity: Arc<dyn Identity>,
}

impl WorkflowClient {
    /// Create a workflow client
    ///
    /// # Arguments
    /// * `client` - Galaxy HTTP client; its root is the API mount point
    /// * `identity` - Provides the current session's username
    pub fn new(client: GalaxyClient, identity: Arc<dyn Identity>) -> Self {
        Self { client, identity }
    }

    /// Username of the session this client decorates records for
    pub fn current_user(&self) -> &str {
        self.identity.username()
    }

    /// Fetch every workflow visible to the session, with derived attributes.
    pub async fn list(&self) -> Result<Vec<Workflow>, RequestError> {
        let response = self.client.get(&WORKFLOWS_PATH).await?;
        let mut workflows: Vec<Workflow> = GalaxyClient::json(response).await?;

        let current_user = self.current_user();
        for workflow in &mut workflows {
            workflow.derive_attributes(current_user);
        }

        log::debug!("Listed {} workflow(s)", workflows.len());
        Ok(workflows)
    }

    /// Create a workflow from a draft, returning the server's record as-is.
    pub async fn create<T: Serialize + ?Sized>(&self, draft: &T) -> Result<Value, RequestError> {
        let body = CreateRequest { workflow: draft };
        let response = self.client.post_json(&WORKFLOWS_PATH, &body).await?;
        GalaxyClient::json(response).await
    }

    /// Send `patch` to workflow `id`, returning the server's response as-is.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        id: &str,
        patch: &T,
    ) -> Result<Value, RequestError> {
        let response = self.client.put_json(&["api", "workflows", id], patch).await?;
        GalaxyClient::json(response).await
    }

    /// Delete workflow `id`, returning the server's response as-is.
    pub async fn delete(&self, id: &str) -> Result<Value, RequestError> {
        let response = self.client.delete(&["api", "workflows", id]).await?;
        GalaxyClient::json(response).await
    }

    /// Duplicate a workflow under a new name.
    ///
    /// Downloads the full definition of `workflow`, renames it with
    /// [`copy_name`] and creates it. The duplicate only exists once the
    /// create succeeds, so a failure at either step leaves nothing behind,
    /// and a successful create is always reported as success.
    pub async fn copy(&self, workflow: &Workflow) -> Result<Workflow, RequestError> {
        let path = ["api", "workflows", workflow.id.as_str(), "download"];
        let response = self.client.get(&path).await?;
        let mut export: Value = GalaxyClient::json(response).await?;

        let current_user = self.current_user();
        let name = copy_name(&workflow.name, &workflow.owner, current_user);
        match export.as_object_mut() {
            Some(definition) => {
                definition.insert("name".to_string(), Value::String(name.clone()));
            }
            None => {
                return Err(RequestError::invalid_response(
                    "workflow download is not a JSON object",
                ));
            }
        }

        // The duplicate exists from here on; decode without failing
        let created = self.create(&export).await?;
        let copy = Workflow::from_value_lossy(created, &name);

        log::debug!("Copied workflow {} to {}", workflow.id, copy.id);
        Ok(copy.with_attributes(current_user))
    }
}

/// Name given to a copy of `name`.
///
/// Copies of another user's workflow also record whose it was.
pub fn copy_name(name: &str, owner: &str, current_user: &str) -> String {
    if owner != current_user {
        format!("Copy of {} shared by user {}", name, owner)
    } else {
        format!("Copy of {}", name)
    }
}
