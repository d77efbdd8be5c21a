//! Supabase PostgREST task store

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;
use url::Url;

use super::config::SupabaseConfig;
use super::wire::{expect_success, read_json, CompletionPatch, HttpFailure};
use crate::domain::{NewTask, Session, Task, TaskId};
use crate::repository::{StoreError, StoreResult, TaskStore};

/// Table holding the tasks
pub const TODOS_TABLE: &str = "todos";

/// [`TaskStore`] over a project's `rest/v1` API.
///
/// Row-level security on the table restricts every call to the rows of the
/// user whose access token is sent.
pub struct SupabaseTasks {
    http: Client,
    config: SupabaseConfig,
    table: String,
}

impl SupabaseTasks {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            table: TODOS_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn table_url(&self) -> Result<Url, HttpFailure> {
        Ok(self.config.endpoint(&format!("rest/v1/{}", self.table))?)
    }

    fn row_url(&self, id: &TaskId) -> Result<Url, HttpFailure> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, session: &Session) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
    }

    async fn fetch_all(&self, session: &Session) -> Result<Vec<Task>, HttpFailure> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "inserted_at.desc");
        let response = self.request(Method::GET, url, session).send().await?;
        read_json(response).await
    }

    async fn insert(&self, session: &Session, draft: &NewTask) -> Result<Vec<Task>, HttpFailure> {
        let response = self
            .request(Method::POST, self.table_url()?, session)
            .header("Prefer", "return=representation")
            .json(draft)
            .send()
            .await?;
        read_json(response).await
    }

    async fn patch(&self, session: &Session, id: &TaskId, completed: bool) -> Result<(), HttpFailure> {
        let response = self
            .request(Method::PATCH, self.row_url(id)?, session)
            .json(&CompletionPatch {
                is_complete: completed,
            })
            .send()
            .await?;
        expect_success(response).await
    }

    async fn remove(&self, session: &Session, id: &TaskId) -> Result<(), HttpFailure> {
        let response = self
            .request(Method::DELETE, self.row_url(id)?, session)
            .send()
            .await?;
        expect_success(response).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TaskStore for SupabaseTasks {
    async fn list(&self, session: &Session) -> StoreResult<Vec<Task>> {
        let tasks = self.fetch_all(session).await?;
        debug!(count = tasks.len(), "fetched todos");
        Ok(tasks)
    }

    async fn create(&self, session: &Session, draft: &NewTask) -> StoreResult<Task> {
        self.insert(session, draft)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn set_completed(
        &self,
        session: &Session,
        id: &TaskId,
        completed: bool,
    ) -> StoreResult<()> {
        Ok(self.patch(session, id, completed).await?)
    }

    async fn delete(&self, session: &Session, id: &TaskId) -> StoreResult<()> {
        Ok(self.remove(session, id).await?)
    }
}
