//! CLI helper functions

use crate::{
    client::{Auth, AuthType, GalaxyClient},
    session::{Identity, Session},
    workflows::{Workflow, WorkflowClient},
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Load Galaxy client from environment variables
///
/// Expected environment variables:
/// - GALAXY_URL: Galaxy root URL (required)
/// - GALAXY_AUTH_TYPE: Force `apikey`, `basic` or `none` (optional)
/// - GALAXY_APIKEY: API key for auth (optional)
/// - GALAXY_USERNAME: Username for basic auth (optional)
/// - GALAXY_PASSWORD: Password for basic auth (optional)
///
/// Without GALAXY_AUTH_TYPE an API key wins over basic credentials.
pub fn load_galaxy_client() -> Result<GalaxyClient> {
    let url_str = std::env::var("GALAXY_URL").context("GALAXY_URL environment variable not set")?;
    let url = Url::parse(&url_str).with_context(|| format!("Invalid GALAXY_URL: {}", url_str))?;

    let apikey = std::env::var("GALAXY_APIKEY").ok();
    let username = std::env::var("GALAXY_USERNAME").ok();
    let password = std::env::var("GALAXY_PASSWORD").ok();

    let auth = match std::env::var("GALAXY_AUTH_TYPE") {
        Ok(auth_type) => {
            let auth_type = auth_type
                .parse::<AuthType>()
                .map_err(|_| eyre::eyre!("Invalid GALAXY_AUTH_TYPE: {}", auth_type))?;
            Auth::new(&auth_type, username, password, apikey)
        }
        Err(_) => match (apikey, username, password) {
            (Some(apikey), _, _) => Auth::Apikey(apikey),
            (None, Some(username), Some(password)) => Auth::Basic(username, password),
            _ => Auth::None,
        },
    };
    log::debug!("Using {} auth for {}", auth, url.bright_black());

    GalaxyClient::try_new(url, auth).context("Failed to create Galaxy client")
}

/// Resolve the session identity
///
/// GALAXY_USER names the current user directly; otherwise the server is
/// asked via `api/users/current`.
pub async fn load_session(client: &GalaxyClient) -> Result<Session> {
    if let Ok(username) = std::env::var("GALAXY_USER") {
        log::debug!("Using session user from GALAXY_USER: {}", username);
        return Ok(Session::new(username));
    }

    Session::fetch(client)
        .await
        .context("Failed to resolve current Galaxy user")
}

/// Test authorization against the server
///
/// Always asks `api/users/current`, ignoring GALAXY_USER, so the
/// connection and credentials are really exercised.
pub async fn check_auth() -> Result<Session> {
    let client = load_galaxy_client()?;
    log::info!("Testing authorization against {}", client.url().bright_black());

    let session = Session::fetch(&client)
        .await
        .with_context(|| format!("Authorization check against {} failed", client.url()))?;

    if let Ok(configured) = std::env::var("GALAXY_USER") {
        if configured != session.username() {
            log::warn!(
                "GALAXY_USER is {} but the server reports {}",
                configured.cyan(),
                session.username().cyan()
            );
        }
    }
    Ok(session)
}

/// Build a workflow client from environment variables
pub async fn load_workflow_client() -> Result<WorkflowClient> {
    let client = load_galaxy_client()?;
    let session = load_session(&client).await?;
    Ok(WorkflowClient::new(client, Arc::new(session)))
}

/// Read a JSON document from disk
pub fn read_json_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Create a workflow from a JSON draft file
pub async fn create_workflow_from_file(
    client: &WorkflowClient,
    draft_file: impl AsRef<Path>,
) -> Result<Value> {
    let draft_file = draft_file.as_ref();
    let draft = read_json_file(draft_file)?;

    log::info!("Creating workflow from {}", draft_file.display());
    let created = client
        .create(&draft)
        .await
        .context("Failed to create workflow")?;
    Ok(created)
}

/// Apply a JSON patch file to workflow `id`
pub async fn update_workflow_from_file(
    client: &WorkflowClient,
    id: &str,
    patch_file: impl AsRef<Path>,
) -> Result<Value> {
    let patch_file = patch_file.as_ref();
    let patch = read_json_file(patch_file)?;

    log::info!("Updating workflow {} from {}", id.cyan(), patch_file.display());
    let updated = client
        .update(id, &patch)
        .await
        .with_context(|| format!("Failed to update workflow {}", id))?;
    Ok(updated)
}

/// Copy the listed workflow with the given id
pub async fn copy_workflow_by_id(client: &WorkflowClient, id: &str) -> Result<Workflow> {
    let workflows = client.list().await.context("Failed to list workflows")?;
    let Some(original) = workflows.iter().find(|w| w.id == id) else {
        eyre::bail!("Workflow {} not found", id);
    };

    log::info!("Copying workflow {} ({})", original.name.cyan(), id);
    let copy = client
        .copy(original)
        .await
        .with_context(|| format!("Failed to copy workflow {}", id))?;
    Ok(copy)
}

/// One-line summary of a listed workflow
pub fn format_workflow(workflow: &Workflow) -> String {
    let owner = if workflow.shared {
        format!("shared by {}", workflow.owner)
    } else {
        "owned".to_string()
    };
    format!(
        "{}\t{}\t{}\t{}",
        workflow.id, workflow.name, owner, workflow.description
    )
}
