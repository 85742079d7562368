//! HttpSimilarityClient - 類似度サービス / ドキュメント一覧サービスの HTTP 実装
//!
//! # エンドポイント
//! - `GET  {topic}/find-similar/by-id?noteId=<id>` → `{ids: [..]}`
//! - `POST {topic}/find-similar/by-content {content, topN}` → `{ids: [..]}`
//! - `GET  {note}/note/ids?workspaceId=<id>` → `{ids: [..]}`
//!
//! 200 以外はすべてエラー。タイムアウトはクライアント単位（既定 3 秒）。

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::config::CollaboratorConfig;
use crate::domain::WorkspaceId;
use crate::ports::{CollaboratorError, SimilarityClient};

const TOPIC_SERVICE: &str = "topic";
const DOCUMENT_SERVICE: &str = "document";

#[derive(Debug, Deserialize)]
struct IdsResponse {
    #[serde(default)]
    ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentQuery<'a> {
    content: &'a str,
    top_n: usize,
}

pub struct HttpSimilarityClient {
    http: Client,
    topic_url: String,
    note_url: String,
}

impl HttpSimilarityClient {
    pub fn new(config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::Transport {
                service: "http client",
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            topic_url: config.topic_url.trim_end_matches('/').to_owned(),
            note_url: config.note_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn fetch_ids(
        service: &'static str,
        request: RequestBuilder,
    ) -> Result<Vec<String>, CollaboratorError> {
        let transport = |e: reqwest::Error| CollaboratorError::Transport {
            service,
            message: e.to_string(),
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(CollaboratorError::Status {
                service,
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(transport)?;
        parse_ids(service, &body)
    }
}

fn parse_ids(service: &'static str, body: &[u8]) -> Result<Vec<String>, CollaboratorError> {
    serde_json::from_slice::<IdsResponse>(body)
        .map(|response| response.ids.unwrap_or_default())
        .map_err(|e| CollaboratorError::Decode {
            service,
            message: e.to_string(),
        })
}

#[async_trait]
impl SimilarityClient for HttpSimilarityClient {
    /// The by-id endpoint ranks on its own; the list is cut to `top_n` here.
    async fn similar_to(
        &self,
        document_id: &str,
        top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        let request = self
            .http
            .get(format!("{}/find-similar/by-id", self.topic_url))
            .query(&[("noteId", document_id)]);
        let mut ids = Self::fetch_ids(TOPIC_SERVICE, request).await?;
        ids.truncate(top_n);
        debug!(document_id, found = ids.len(), "similar documents by id");
        Ok(ids)
    }

    async fn similar_to_content(
        &self,
        content: &str,
        top_n: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        let request = self
            .http
            .post(format!("{}/find-similar/by-content", self.topic_url))
            .json(&ContentQuery { content, top_n });
        Self::fetch_ids(TOPIC_SERVICE, request).await
    }

    async fn list_document_ids(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<String>, CollaboratorError> {
        let request = self
            .http
            .get(format!("{}/note/ids", self.note_url))
            .query(&[("workspaceId", workspace.as_str())]);
        Self::fetch_ids(DOCUMENT_SERVICE, request).await
    }
}
