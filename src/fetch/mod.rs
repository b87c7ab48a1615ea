//! Suggestion backends.
//!
//! Every backend answers the same question: given a non-empty query, which
//! candidates should be offered? The remote variants hit the network on each
//! call; the local variant loads its corpus once and answers from memory.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Result, SuggestError};
use crate::model::{Candidate, Query};

pub mod fuzzy;
pub mod geocode;
pub mod local;
pub mod remote;

pub use fuzzy::{FuzzyIndex, Rank};
pub use geocode::Geocoder;
pub use local::LocalIndex;
pub use remote::RemoteSearch;

#[async_trait]
pub trait SuggestionFetcher: Send + Sync + 'static {
    /// Retrieves candidates for `query`, best first.
    async fn fetch(&self, query: &Query) -> Result<Vec<Candidate>>;
}

/// One ranked match as returned by the location search endpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchMatch {
    pub target: String,
    #[serde(default)]
    pub distance: Option<usize>,
}

impl From<SearchMatch> for Candidate {
    fn from(m: SearchMatch) -> Self {
        let candidate = Candidate::labelled(m.target);
        match m.distance {
            Some(d) => candidate.with_distance(d),
            None => candidate,
        }
    }
}

/// Sends `request` and decodes a JSON body.
///
/// Transport failures and non-success statuses are network errors; a body that
/// is not the expected JSON is a parse error.
pub(crate) async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SuggestError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
