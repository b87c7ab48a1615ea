use async_trait::async_trait;
use serde::Deserialize;

use super::{get_json, SearchMatch, SuggestionFetcher};
use crate::error::Result;
use crate::model::{Candidate, Query};

/// Server-side ranked search: `GET <endpoint>?query=<text>`.
pub struct RemoteSearch {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    // The server encodes "no matches" as null rather than [].
    #[serde(default)]
    matches: Option<Vec<SearchMatch>>,
}

impl RemoteSearch {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SuggestionFetcher for RemoteSearch {
    async fn fetch(&self, query: &Query) -> Result<Vec<Candidate>> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query.as_str())]);
        let body: SearchResponse = get_json(request).await?;

        Ok(body
            .matches
            .unwrap_or_default()
            .into_iter()
            .map(Candidate::from)
            .collect())
    }
}
