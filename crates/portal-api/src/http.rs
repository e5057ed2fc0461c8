//! HTTP implementation of the account API.

use async_trait::async_trait;
use portal_core::PortalConfig;
use portal_model::{Account, AccountId, AccountPatch, NewAccount};
use serde::de::DeserializeOwned;

use crate::client::{AccountApi, AccountQuery, Collection, Created};
use crate::error::{message_from_body, ApiError, ApiResult};

/// Account API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAccountApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAccountApi {
    /// Creates a new API client from the portal configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &PortalConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(client, &config.api_url))
    }

    /// Creates a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}{}", self.base_url, collection.path())
    }

    fn record_url(&self, collection: Collection, id: &AccountId) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            collection.path(),
            urlencoding::encode(&id.to_string())
        )
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn find(
        &self,
        collection: Collection,
        query: &AccountQuery,
    ) -> ApiResult<Vec<Account>> {
        let url = format!(
            "{}?{}",
            self.collection_url(collection),
            query.to_query_string()
        );
        tracing::debug!(%collection, "GET lookup");
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    async fn list(&self, collection: Collection) -> ApiResult<Vec<Account>> {
        tracing::debug!(%collection, "GET list");
        let response = self
            .client
            .get(self.collection_url(collection))
            .send()
            .await?;
        handle_response(response).await
    }

    async fn get(&self, collection: Collection, id: &AccountId) -> ApiResult<Account> {
        tracing::debug!(%collection, %id, "GET record");
        let response = self.client.get(self.record_url(collection, id)).send().await?;
        handle_response(response).await
    }

    async fn create(&self, collection: Collection, account: &NewAccount) -> ApiResult<Created> {
        tracing::debug!(%collection, "POST record");
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(account)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.bytes().await?;
        let account = match serde_json::from_slice::<Account>(&body) {
            Ok(account) => Some(account),
            Err(e) => {
                tracing::debug!(%collection, "create response carried no record: {}", e);
                None
            }
        };

        Ok(Created {
            status: status.as_u16(),
            account,
        })
    }

    async fn replace(&self, collection: Collection, account: &Account) -> ApiResult<Account> {
        tracing::debug!(%collection, id = %account.id, "PUT record");
        let response = self
            .client
            .put(self.record_url(collection, &account.id))
            .json(account)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn patch(
        &self,
        collection: Collection,
        id: &AccountId,
        patch: &AccountPatch,
    ) -> ApiResult<Account> {
        tracing::debug!(%collection, %id, "PATCH record");
        let response = self
            .client
            .patch(self.record_url(collection, id))
            .json(patch)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn delete(&self, collection: Collection, id: &AccountId) -> ApiResult<()> {
        tracing::debug!(%collection, %id, "DELETE record");
        let response = self
            .client
            .delete(self.record_url(collection, id))
            .send()
            .await?;
        handle_empty_response(response).await
    }
}

/// Handles a response with a body.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    if response.status().is_success() {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Handles a response without a body.
async fn handle_empty_response(response: reqwest::Response) -> ApiResult<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .map(|body| message_from_body(&body))
        .unwrap_or_else(|_| "Unknown error".to_string());
    ApiError::Status { status, message }
}
