use crate::config::ClientConfig;
use crate::error::CardexError;
use crate::filter::FilterState;
use crate::utils::logging::{body_preview, debug_pretty_json};
use cardex_schema::{ApiEnvelope, Backend, CardId, CardPayload, GraphicsCard};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::debug;
use url::Url;

pub const BODY_PREVIEW_CHARS: usize = 300;

/// Typed access to `/api/{backend}/cards`.
///
/// Response bodies are decoded whatever the HTTP status, because the catalog
/// server reports failures as `{success: false, error}` with 404/500.
#[derive(Debug, Clone)]
pub struct CatalogApi {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogApi {
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self, CardexError> {
        Ok(Self::new(cfg.build_http_client()?, cfg.base_url.clone()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cards_url(&self, backend: Backend) -> Result<Url, CardexError> {
        Ok(self
            .base_url
            .join(&format!("api/{}/cards", backend.path_segment()))?)
    }

    /// The id is percent-encoded as one path segment.
    pub fn card_url(&self, backend: Backend, id: &CardId) -> Result<Url, CardexError> {
        let mut url = self.cards_url(backend)?;
        url.path_segments_mut()
            .map_err(|()| {
                CardexError::Validation(format!("base url `{}` cannot carry a path", self.base_url))
            })?
            .push(id.as_str());
        Ok(url)
    }

    pub fn build_list_request(
        &self,
        backend: Backend,
        filters: &FilterState,
    ) -> Result<reqwest::Request, CardexError> {
        let mut url = self.cards_url(backend)?;
        let query = filters.query_string();
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        Ok(self.client.get(url).build()?)
    }

    pub fn build_create_request(
        &self,
        backend: Backend,
        payload: &CardPayload,
    ) -> Result<reqwest::Request, CardexError> {
        Ok(self
            .client
            .post(self.cards_url(backend)?)
            .json(payload)
            .build()?)
    }

    pub fn build_update_request(
        &self,
        backend: Backend,
        id: &CardId,
        payload: &CardPayload,
    ) -> Result<reqwest::Request, CardexError> {
        Ok(self
            .client
            .put(self.card_url(backend, id)?)
            .json(payload)
            .build()?)
    }

    pub fn build_delete_request(
        &self,
        backend: Backend,
        id: &CardId,
    ) -> Result<reqwest::Request, CardexError> {
        Ok(self.client.delete(self.card_url(backend, id)?).build()?)
    }

    pub async fn list_cards(
        &self,
        backend: Backend,
        filters: &FilterState,
    ) -> Result<Vec<GraphicsCard>, CardexError> {
        let req = self.build_list_request(backend, filters)?;
        let envelope: ApiEnvelope<Vec<GraphicsCard>> = self.execute(req).await?;
        envelope
            .data
            .ok_or_else(|| CardexError::Validation("card list response has no `data`".to_string()))
    }

    /// Returns the new card's id when the server reports one.
    pub async fn create_card(
        &self,
        backend: Backend,
        payload: &CardPayload,
    ) -> Result<Option<CardId>, CardexError> {
        debug_pretty_json("Create card payload", payload);
        let req = self.build_create_request(backend, payload)?;
        let envelope: ApiEnvelope<IgnoredAny> = self.execute(req).await?;
        Ok(envelope.id)
    }

    pub async fn update_card(
        &self,
        backend: Backend,
        id: &CardId,
        payload: &CardPayload,
    ) -> Result<(), CardexError> {
        debug_pretty_json("Update card payload", payload);
        let req = self.build_update_request(backend, id, payload)?;
        let _: ApiEnvelope<IgnoredAny> = self.execute(req).await?;
        Ok(())
    }

    pub async fn delete_card(&self, backend: Backend, id: &CardId) -> Result<(), CardexError> {
        let req = self.build_delete_request(backend, id)?;
        let _: ApiEnvelope<IgnoredAny> = self.execute(req).await?;
        Ok(())
    }

    async fn execute<T>(&self, req: reqwest::Request) -> Result<ApiEnvelope<T>, CardexError>
    where
        T: DeserializeOwned,
    {
        let method = req.method().clone();
        let url = req.url().clone();
        debug!(%method, %url, "Catalog request");

        let resp = self.client.execute(req).await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes).map_err(|error| {
            debug!(
                %method,
                %url,
                %status,
                %error,
                body = %body_preview(&bytes, BODY_PREVIEW_CHARS),
                "Catalog response did not match the card schema"
            );
            CardexError::Validation(format!("unexpected response (HTTP {status}): {error}"))
        })?;

        envelope.into_result().map_err(|message| {
            debug!(%method, %url, %status, error = %message, "Catalog reported failure");
            CardexError::Application(message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn api(base: &str) -> CatalogApi {
        CatalogApi::new(
            reqwest::Client::new(),
            Url::parse(base).expect("valid base url"),
        )
    }

    fn sample_payload() -> CardPayload {
        CardPayload {
            name: "RTX 4090".to_string(),
            manufacturer: "NVIDIA".to_string(),
            model: "FE".to_string(),
            memory_gb: 24,
            memory_type: "GDDR6X".to_string(),
            core_clock_mhz: 2235,
            boost_clock_mhz: None,
            price_usd: None,
            release_date: None,
        }
    }

    #[test]
    fn list_request_without_filters_has_no_query() {
        let req = api("http://example.test/")
            .build_list_request(Backend::Relational, &FilterState::default())
            .expect("failed to build request");
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.url().as_str(), "http://example.test/api/mysql/cards");
    }

    #[test]
    fn list_request_carries_non_empty_filters() {
        let filters = FilterState {
            search: " 4090 ".to_string(),
            price_max: "2000".to_string(),
            ..FilterState::default()
        };
        let req = api("http://example.test/")
            .build_list_request(Backend::Document, &filters)
            .expect("failed to build request");
        assert_eq!(
            req.url().as_str(),
            "http://example.test/api/mongodb/cards?search=4090&price_max=2000"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let url = api("http://example.test/catalog/")
            .cards_url(Backend::Relational)
            .expect("valid url");
        assert_eq!(url.as_str(), "http://example.test/catalog/api/mysql/cards");
    }

    #[test]
    fn update_and_delete_target_the_card_id() {
        let api = api("http://example.test/");
        let id = CardId::new("65a1f0c2e4b0a1b2c3d4e5f6").expect("non-empty id");

        let put = api
            .build_update_request(Backend::Document, &id, &sample_payload())
            .expect("failed to build request");
        assert_eq!(put.method(), Method::PUT);
        assert_eq!(
            put.url().as_str(),
            "http://example.test/api/mongodb/cards/65a1f0c2e4b0a1b2c3d4e5f6"
        );
        assert_eq!(
            put.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );

        let delete = api
            .build_delete_request(Backend::Relational, &CardId::new("a/b").expect("non-empty id"))
            .expect("failed to build request");
        assert_eq!(delete.method(), Method::DELETE);
        assert_eq!(
            delete.url().as_str(),
            "http://example.test/api/mysql/cards/a%2Fb"
        );
    }

    #[test]
    fn create_body_is_the_payload_json() {
        let req = api("http://example.test/")
            .build_create_request(Backend::Relational, &sample_payload())
            .expect("failed to build request");
        assert_eq!(req.method(), Method::POST);
        let body = req
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("json body is buffered");
        let value: serde_json::Value = serde_json::from_slice(body).expect("body is json");
        assert_eq!(value["memory_gb"], 24);
        assert!(value.get("price_usd").is_none());
    }
}
