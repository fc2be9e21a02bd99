//! Integration tests for workflows functionality

use eyre::Result;
use galaxy_workflows::cli::{
    copy_workflow_by_id, create_workflow_from_file, update_workflow_from_file,
};
use galaxy_workflows::{Auth, GalaxyClient, Session, WorkflowClient};
use mockito::{Matcher, ServerGuard};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;

fn workflow_client(server: &ServerGuard, user: &str) -> Result<WorkflowClient> {
    let url = Url::parse(&format!("{}/galaxy", server.url()))?;
    let client = GalaxyClient::try_new(url, Auth::Apikey("test-key".to_string()))?;
    Ok(WorkflowClient::new(client, Arc::new(Session::new(user))))
}

fn listing() -> serde_json::Value {
    json!([
        {
            "id": "f2db41e1fa331b3e",
            "name": "RNA-seq",
            "owner": "alice",
            "annotations": ["Paired-end alignment"],
            "published": false,
            "tags": ["rna"]
        },
        {
            "id": "1cd8e2f6b131e891",
            "name": "ChIP-seq",
            "owner": "bob",
            "annotations": ["   "],
            "published": true,
            "tags": []
        }
    ])
}

async fn mock_listing(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/galaxy/api/workflows")
        .match_header("x-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing().to_string())
        .create_async()
        .await
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> Result<std::path::PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
    Ok(path)
}

#[tokio::test]
async fn test_list_under_mounted_root() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_listing(&mut server).await;

    let workflows = workflow_client(&server, "alice")?.list().await?;

    assert_eq!(workflows.len(), 2);
    assert_eq!(workflows[0].description, "Paired-end alignment");
    assert!(!workflows[0].shared);
    assert_eq!(workflows[1].description, "Not available");
    assert!(workflows[1].shared);
    assert_eq!(workflows[1].extra["published"], json!(true));
    mock.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn test_concurrent_operations() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let list = server
        .mock("GET", "/galaxy/api/workflows")
        .with_status(200)
        .with_body(listing().to_string())
        .expect(2)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/galaxy/api/workflows/1cd8e2f6b131e891")
        .with_status(200)
        .with_body(r#""Workflow 'ChIP-seq' successfully deleted.""#)
        .expect(1)
        .create_async()
        .await;

    let client = workflow_client(&server, "alice")?;
    let other = client.clone();
    let (first, second, deleted) = tokio::join!(
        client.list(),
        other.list(),
        client.delete("1cd8e2f6b131e891")
    );

    assert_eq!(first?, second?);
    assert_eq!(deleted?, json!("Workflow 'ChIP-seq' successfully deleted."));
    list.assert_async().await;
    delete.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn test_create_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let draft = json!({
        "a_galaxy_workflow": "true",
        "name": "Variant calling",
        "steps": {}
    });
    let draft_file = write_json(temp_dir.path(), "draft.json", &draft)?;

    let mut server = mockito::Server::new_async().await;
    let created = json!({"id": "0a248a1f62a0cc04", "name": "Variant calling", "owner": "alice"});
    let mock = server
        .mock("POST", "/galaxy/api/workflows")
        .match_body(Matcher::Json(json!({ "workflow": draft })))
        .with_status(200)
        .with_body(created.to_string())
        .expect(1)
        .create_async()
        .await;

    let client = workflow_client(&server, "alice")?;
    let result = create_workflow_from_file(&client, &draft_file).await?;

    assert_eq!(result, created);
    mock.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn test_update_from_file_reports_server_message() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let patch_file = write_json(temp_dir.path(), "patch.json", &json!({"published": true}))?;

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/galaxy/api/workflows/1cd8e2f6b131e891")
        .with_status(403)
        .with_body(r#"{"err_msg": "Workflow is not owned by current user.", "err_code": 403002}"#)
        .create_async()
        .await;

    let client = workflow_client(&server, "alice")?;
    let err = update_workflow_from_file(&client, "1cd8e2f6b131e891", &patch_file)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to update workflow 1cd8e2f6b131e891"));
    assert_eq!(
        err.root_cause().to_string(),
        "Workflow is not owned by current user."
    );

    Ok(())
}

#[tokio::test]
async fn test_copy_shared_workflow_by_id() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _listing = mock_listing(&mut server).await;
    let _mock = server
        .mock("GET", "/galaxy/api/workflows/1cd8e2f6b131e891/download")
        .with_status(200)
        .with_body(r#"{"a_galaxy_workflow": "true", "name": "ChIP-seq", "steps": {}}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/galaxy/api/workflows")
        .match_body(Matcher::Json(json!({"workflow": {
            "a_galaxy_workflow": "true",
            "name": "Copy of ChIP-seq shared by user bob",
            "steps": {}
        }})))
        .with_status(200)
        .with_body(
            json!({
                "id": "5969b1f7201f12ae",
                "name": "Copy of ChIP-seq shared by user bob",
                "owner": "alice",
                "annotations": []
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = workflow_client(&server, "alice")?;
    let copy = copy_workflow_by_id(&client, "1cd8e2f6b131e891").await?;

    assert_eq!(copy.id, "5969b1f7201f12ae");
    assert_eq!(copy.name, "Copy of ChIP-seq shared by user bob");
    assert!(!copy.shared);
    assert_eq!(copy.description, "Not available");
    create.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn test_copy_unknown_id() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _listing = mock_listing(&mut server).await;

    let client = workflow_client(&server, "alice")?;
    let err = copy_workflow_by_id(&client, "missing").await.unwrap_err();

    assert_eq!(err.to_string(), "Workflow missing not found");

    Ok(())
}
