use async_trait::async_trait;
use serde::Deserialize;

use super::{get_json, SuggestionFetcher};
use crate::error::Result;
use crate::model::{Candidate, Query};

/// Geocoding autocomplete: `GET <endpoint>?text=<text>&apiKey=<key>`.
pub struct Geocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Deserialize)]
struct Properties {
    formatted: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl From<Properties> for Candidate {
    fn from(p: Properties) -> Self {
        let candidate = Candidate::labelled(p.formatted);
        match (p.lat, p.lon) {
            (Some(lat), Some(lon)) => candidate.with_coordinates(lat, lon),
            _ => candidate,
        }
    }
}

impl Geocoder {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl SuggestionFetcher for Geocoder {
    async fn fetch(&self, query: &Query) -> Result<Vec<Candidate>> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("text", query.as_str())]);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("apiKey", key.as_str())]);
        }

        let body: GeocodeResponse = get_json(request).await?;
        Ok(body
            .features
            .into_iter()
            .map(|f| Candidate::from(f.properties))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{FixtureServer, Route};

    const PARIS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"formatted": "Paris, France", "lat": 48.8588897, "lon": 2.3200410, "country": "France"}},
            {"type": "Feature", "properties": {"formatted": "Paris, TX, United States of America", "lat": 33.6617962, "lon": -95.555513}}
        ]
    }"#;

    #[tokio::test]
    async fn test_fetch_carries_coordinates() {
        let server = FixtureServer::start(vec![Route::ok("/autocomplete", PARIS)]).await;
        let geocoder = Geocoder::new(
            reqwest::Client::new(),
            server.url("/autocomplete"),
            Some("secret".into()),
        );

        let candidates = geocoder.fetch(&Query::parse("paris").unwrap()).await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "Paris, France");
        assert_eq!(candidates[0].coordinates(), Some((48.8588897, 2.3200410)));
        assert_eq!(candidates[1].coordinates(), Some((33.6617962, -95.555513)));

        let requests = server.requests().await;
        assert_eq!(requests, vec!["/autocomplete?text=paris&apiKey=secret".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_coordinates_are_optional() {
        let server = FixtureServer::start(vec![Route::ok(
            "/autocomplete",
            r#"{"features":[{"properties":{"formatted":"Somewhere"}}]}"#,
        )])
        .await;
        let geocoder = Geocoder::new(reqwest::Client::new(), server.url("/autocomplete"), None);

        let candidates = geocoder.fetch(&Query::parse("some").unwrap()).await.unwrap();
        assert_eq!(candidates, vec![Candidate::labelled("Somewhere")]);
        assert_eq!(server.requests().await, vec!["/autocomplete?text=some".to_string()]);
    }

    #[tokio::test]
    async fn test_feature_without_label_is_parse_error() {
        let server = FixtureServer::start(vec![Route::ok(
            "/autocomplete",
            r#"{"features":[{"properties":{"lat":1.0,"lon":2.0}}]}"#,
        )])
        .await;
        let geocoder = Geocoder::new(reqwest::Client::new(), server.url("/autocomplete"), None);

        let err = geocoder.fetch(&Query::parse("x").unwrap()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
