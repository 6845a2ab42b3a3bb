//! HTTP client for the customer endpoints.
//!
//! Every call carries `Authorization: Basic ...` and a JSON content type.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use url::Url;

use customer_hub_core::{
    ApiResponse, Customer, CustomerId, CustomerInput, MessageResponse, Paginated,
    ValidationErrorBody,
};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Comma-separated sort terms, e.g. `-dob,last_name`.
    pub sort: Option<String>,
    pub page: Option<u32>,
}

/// Client for `/customers` under the configured API root.
#[derive(Clone)]
pub struct CustomerApi {
    inner: Arc<CustomerApiInner>,
}

struct CustomerApiInner {
    client: reqwest::Client,
    config: ClientConfig,
}

impl CustomerApi {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(CustomerApiInner {
                client: reqwest::Client::new(),
                config,
            }),
        }
    }

    fn collection_url(&self) -> Result<Url, ClientError> {
        Ok(self.inner.config.base_url.join("customers")?)
    }

    fn member_url(&self, id: CustomerId) -> Result<Url, ClientError> {
        Ok(self.inner.config.base_url.join(&format!("customers/{id}"))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let config = &self.inner.config;
        self.inner
            .client
            .request(method, url)
            .basic_auth(&config.username, Some(config.password.expose_secret()))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
    }

    /// `GET /customers`
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or a non-success status.
    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<ApiResponse<Paginated<Customer>>, ClientError> {
        let mut url = self.collection_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(sort) = &params.sort {
                pairs.append_pair("sort", sort);
            }
            if let Some(page) = params.page {
                pairs.append_pair("page", &page.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let response = self.request(Method::GET, url).send().await?;
        decode(response).await
    }

    /// `GET /customers/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 if the customer is unknown.
    pub async fn get(&self, id: CustomerId) -> Result<ApiResponse<Customer>, ClientError> {
        let response = self.request(Method::GET, self.member_url(id)?).send().await?;
        decode(response).await
    }

    /// `POST /customers`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` with the field errors on 422.
    pub async fn create(&self, input: &CustomerInput) -> Result<ApiResponse<Customer>, ClientError> {
        let response = self
            .request(Method::POST, self.collection_url()?)
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    /// `PUT /customers/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` on 404 or 422.
    pub async fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<ApiResponse<Customer>, ClientError> {
        let response = self
            .request(Method::PUT, self.member_url(id)?)
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    /// `DELETE /customers/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 if the customer is unknown.
    pub async fn delete(&self, id: CustomerId) -> Result<MessageResponse, ClientError> {
        let response = self
            .request(Method::DELETE, self.member_url(id)?)
            .send()
            .await?;
        decode(response).await
    }
}

/// Read the body and decode it, turning non-success statuses into
/// `ClientError::Status` with whatever message the server gave.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &text));
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::debug!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Unexpected response body"
        );
        ClientError::Decode(e)
    })
}

fn status_error(status: u16, body: &str) -> ClientError {
    if let Ok(envelope) = serde_json::from_str::<ValidationErrorBody>(body) {
        return ClientError::Status {
            status,
            message: envelope.message,
            errors: Some(envelope.errors),
        };
    }

    let message = serde_json::from_str::<MessageResponse>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    ClientError::Status {
        status,
        message,
        errors: None,
    }
}
