use std::time::Duration;

use async_trait::async_trait;
use emblem_primitives::badge::BadgeRecord;
use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;
use tracing::*;

use crate::{
    error::ClientError,
    traits::BadgeIndexer,
    types::{
        EarnedBadgeCounts, GraphQlRequest, GraphQlResponse, WindowVariables, EARNED_BADGES_QUERY,
    },
};

/// This is an alias for the result type returned by the [`GraphQlIndexer`].
pub type ClientResult<T> = Result<T, ClientError>;

/// The default maximum number of retries for a request.
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// An `async` client for the badge subgraph.
#[derive(Debug)]
pub struct GraphQlIndexer {
    /// The URL of the GraphQL endpoint.
    url: String,
    /// The underlying `async` HTTP client.
    client: Client,
    max_retries: u8,
    retry_interval: Duration,
}

impl GraphQlIndexer {
    pub fn new(url: String) -> ClientResult<Self> {
        let content_type = "application/json"
            .parse()
            .map_err(|_| ClientError::Other("Error parsing header".to_string()))?;
        let headers = HeaderMap::from_iter([(CONTENT_TYPE, content_type)]);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Other(format!("Could not create client: {e}")))?;

        trace!(url = %url, "Created indexer client");

        Ok(Self {
            url,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: Duration::from_millis(1_000),
        })
    }

    pub fn with_retries(mut self, max_retries: u8, retry_interval: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_interval = retry_interval;
        self
    }

    async fn query<V, T>(&self, variables: V) -> ClientResult<T>
    where
        V: Serialize + Clone + std::fmt::Debug,
        T: DeserializeOwned,
    {
        let mut retries = 0;
        loop {
            trace!(?variables, %retries, "Querying indexer");

            let response = self
                .client
                .post(&self.url)
                .json(&GraphQlRequest {
                    query: EARNED_BADGES_QUERY,
                    variables: variables.clone(),
                })
                .send()
                .await
                .and_then(|resp| resp.error_for_status());

            match response {
                Ok(resp) => {
                    let data = resp
                        .json::<GraphQlResponse<T>>()
                        .await
                        .map_err(|e| ClientError::Parse(e.to_string()))?;
                    if !data.errors.is_empty() {
                        return Err(ClientError::Server(
                            data.errors.into_iter().map(|e| e.message).collect(),
                        ));
                    }
                    return data
                        .data
                        .ok_or_else(|| ClientError::Other("Empty data received".to_string()));
                }
                Err(err) => {
                    warn!(err = %err, "Error querying indexer");

                    if err.is_body() {
                        // Body error is unrecoverable
                        return Err(ClientError::Body(err.to_string()));
                    } else if err.is_status() {
                        // Status error is unrecoverable
                        let e = match err.status() {
                            Some(code) => ClientError::Status(code.to_string(), err.to_string()),
                            _ => ClientError::Other(err.to_string()),
                        };
                        return Err(e);
                    } else if err.is_decode() {
                        let e = ClientError::MalformedResponse(err.to_string());
                        warn!(%e, "decoding error, retrying...");
                    } else if err.is_connect() {
                        let e = ClientError::Connection(err.to_string());
                        warn!(%e, "connection error, retrying...");
                    } else if err.is_timeout() {
                        let e = ClientError::Timeout;
                        warn!(%e, "timeout error, retrying...");
                    } else if err.is_request() {
                        let e = ClientError::Request(err.to_string());
                        warn!(%e, "request error, retrying...");
                    } else if err.is_builder() {
                        return Err(ClientError::ReqBuilder(err.to_string()));
                    } else if err.is_redirect() {
                        return Err(ClientError::HttpRedirect(err.to_string()));
                    } else {
                        return Err(ClientError::Other("Unknown error".to_string()));
                    }
                }
            }
            retries += 1;
            if retries >= self.max_retries {
                return Err(ClientError::MaxRetriesExceeded(self.max_retries));
            }
            sleep(self.retry_interval).await;
        }
    }
}

#[async_trait]
impl BadgeIndexer for GraphQlIndexer {
    async fn fetch_window(
        &self,
        starting_index: u64,
        tree_size: u64,
    ) -> ClientResult<Vec<BadgeRecord>> {
        let data: EarnedBadgeCounts = self
            .query(WindowVariables {
                tree_size,
                starting_index,
            })
            .await?;

        let records = data
            .earned_badge_counts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                c.to_record()
                    .map_err(|e| ClientError::Encoding(starting_index + i as u64, e))
            })
            .collect::<ClientResult<Vec<_>>>()?;

        debug!(%starting_index, %tree_size, fetched = records.len(), "fetched badge window");
        Ok(records)
    }
}
