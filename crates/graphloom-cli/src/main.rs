use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use graphloom_core::app::config::TOPIC_SERVICE_URL;
use graphloom_core::app::{AppBuilder, AppConfig};
use graphloom_core::domain::WorkspaceId;
use graphloom_core::impls::HttpSimilarityClient;
use graphloom_core::ports::{CollaboratorError, SimilarityClient};

const JOB_WAIT: Duration = Duration::from_secs(30);

/// 類似度サービスを立てずに動かすための固定データ
const FIXTURE: &str = r#"{
    "documents": ["6517a2624a081a27e7d0f901", "6517a2624a081a27e7d0f902", "6517a2624a081a27e7d0f903"],
    "similar": {
        "6517a2624a081a27e7d0f901": ["6517a2624a081a27e7d0f902", "6517a2624a081a27e7d0f901", "not-an-id"],
        "6517a2624a081a27e7d0f902": ["6517a2624a081a27e7d0f903"],
        "6517a2624a081a27e7d0f903": ["6517a2624a081a27e7d0f901", "6517a2624a081a27e7d0f902"]
    }
}"#;

#[derive(Debug, Deserialize)]
struct FixtureSimilarity {
    documents: Vec<String>,
    similar: HashMap<String, Vec<String>>,
}

#[async_trait]
impl SimilarityClient for FixtureSimilarity {
    async fn similar_to(
        &self,
        document_id: &str,
        top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        let mut ids = self.similar.get(document_id).cloned().unwrap_or_default();
        ids.truncate(top_n);
        Ok(ids)
    }

    async fn similar_to_content(
        &self,
        _content: &str,
        top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.documents.iter().take(top_n).cloned().collect())
    }

    /// どのワークスペースでも同じドキュメント群を返す
    async fn list_document_ids(
        &self,
        _workspace: &WorkspaceId,
    ) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.documents.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // (A) 設定と類似度クライアント（TOPIC_SERVICE_URL があれば HTTP、なければ固定データ）
    let config = AppConfig::from_env()?;
    let similarity: Arc<dyn SimilarityClient> = if std::env::var(TOPIC_SERVICE_URL).is_ok() {
        info!(topic_url = %config.collaborators.topic_url, "using similarity service");
        Arc::new(HttpSimilarityClient::new(&config.collaborators)?)
    } else {
        info!("TOPIC_SERVICE_URL not set, using fixture similarity");
        Arc::new(serde_json::from_str::<FixtureSimilarity>(FIXTURE)?)
    };

    // (B) App を組み立てる（ストアはインメモリ）
    let app = AppBuilder::new(config)
        .with_in_memory_stores()
        .similarity(similarity)
        .build()?;

    // (C) ワークスペースを作り、zettel に切り替える
    let user = std::env::var("GRAPHLOOM_USER").unwrap_or_else(|_| "demo-user".to_owned());
    let workspace = app.create_workspace("Reading Notes", "generic", &user).await?;
    let receipt = app
        .change_workspace_style(workspace.as_str(), &user, "zettel")
        .await?;
    info!(job_id = %receipt.job_id, "{}", receipt.message);

    // (D) ジョブの完了をポーリングで待つ
    let job = app.wait_for_job(&receipt.job_id, JOB_WAIT).await?;
    if !job.status.is_terminal() {
        warn!(job_id = %job.id, "job still pending after {:?}", JOB_WAIT);
    }
    let counts = app.job_counts(workspace.as_str()).await?;
    info!(job_id = %job.id, status = ?job.status, ?counts, "restyle finished");

    // (E) グラフを JSON で出力
    let graph = app.get_workspace_graph(workspace.as_str()).await?;
    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}
