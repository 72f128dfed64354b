//! PostgREST repository (Supabase-compatible).
//!
//! Rows live in one table filtered by `user_id`. Mutations ask the server to
//! return the affected rows, so an empty result means nothing matched.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::instrument;

use netrack_core::model::{ExamRecord, ExamUpdate};
use netrack_core::traits::{sort_newest_first, ChangeEvent, ChangeKind, ExamRepository};
use netrack_core::validate::validate_record;

use crate::error::StoreError;
use crate::table::today;
use crate::CHANGE_CHANNEL_CAPACITY;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Repository talking to a PostgREST endpoint.
pub struct RestStore {
    base_url: String,
    api_key: String,
    table: String,
    client: reqwest::Client,
    events: broadcast::Sender<ChangeEvent>,
}

#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
            client,
            events: broadcast::channel(CHANGE_CHANNEL_CAPACITY).0,
        })
    }

    fn url(&self, params: &[(&str, String)]) -> Result<Url, StoreError> {
        let endpoint = format!("{}/rest/v1/{}", self.base_url, self.table);
        Url::parse_with_params(&endpoint, params).map_err(|e| StoreError::Network(e.to_string()))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn row_filter(user_id: &str, id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("id", format!("eq.{id}")),
            ("user_id", format!("eq.{user_id}")),
        ]
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                StoreError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unauthorized(error_message(body)));
        }
        if status == 404 {
            return Err(StoreError::NotFound(response.url().path().to_string()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend {
                status,
                message: error_message(body),
            });
        }
        Ok(response)
    }

    async fn rows(&self, builder: RequestBuilder) -> Result<Vec<ExamRecord>, StoreError> {
        let response = self.send(builder).await?;
        response.json().await.map_err(|e| StoreError::Backend {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })
    }

    /// The first returned row, or `NotFound` when the filter matched nothing.
    async fn single_row(&self, builder: RequestBuilder, id: &str) -> Result<ExamRecord, StoreError> {
        self.rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn announce(&self, user_id: &str, record_id: &str, kind: ChangeKind) {
        let _ = self
            .events
            .send(ChangeEvent::exams(user_id, record_id, kind));
    }
}

fn error_message(body: String) -> String {
    serde_json::from_str::<PostgrestError>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}

#[async_trait]
impl ExamRepository for RestStore {
    fn name(&self) -> &str {
        "rest"
    }

    #[instrument(skip(self))]
    async fn list(&self, user_id: &str) -> anyhow::Result<Vec<ExamRecord>> {
        let url = self.url(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{user_id}")),
            ("order", "exam_date.desc".to_string()),
        ])?;
        let mut records = self.rows(self.request(Method::GET, url)).await?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn insert(&self, user_id: &str, mut record: ExamRecord) -> anyhow::Result<ExamRecord> {
        let exam_type = validate_record(&record, today()).map_err(StoreError::from)?;
        record.exam_type = exam_type.tag().to_string();
        record.user_id = Some(user_id.to_string());

        let url = self.url(&[])?;
        let builder = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&record);
        let stored = self.single_row(builder, &record.id).await?;

        self.announce(user_id, &stored.id, ChangeKind::Insert);
        Ok(stored)
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: &ExamUpdate,
    ) -> anyhow::Result<ExamRecord> {
        // Validate the merged row before sending the patch. The patch itself
        // never carries owner, id or exam type.
        let patch = update.without_reserved();
        let url = self.url(&Self::row_filter(user_id, id))?;
        let mut merged = self
            .single_row(self.request(Method::GET, url.clone()), id)
            .await?;
        patch.apply_to(&mut merged);
        validate_record(&merged, today()).map_err(StoreError::from)?;

        let builder = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&patch);
        let stored = self.single_row(builder, id).await?;

        self.announce(user_id, id, ChangeKind::Update);
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &str, id: &str) -> anyhow::Result<()> {
        let url = self.url(&Self::row_filter(user_id, id))?;
        let builder = self
            .request(Method::DELETE, url)
            .header("Prefer", "return=representation");
        self.single_row(builder, id).await?;

        self.announce(user_id, id, ChangeKind::Delete);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}
