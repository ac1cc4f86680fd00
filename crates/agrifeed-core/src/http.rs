//! Shared HTTP plumbing for the service clients.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{NetworkError, ReqwestErrorExt};

/// Build the shared HTTP client.
///
/// No request timeout is set: API fetches wait until the service answers.
/// Only the device geolocation stage is time-bounded, and it does that itself.
pub fn build_client(user_agent: &str) -> Result<Client, NetworkError> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| e.into_network_error())
}

/// Send a request and decode a JSON body.
///
/// Non-2xx statuses become `ServerError`; a body that does not decode into
/// `T` becomes `InvalidResponse`.
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, NetworkError> {
    let response = request.send().await.map_err(|e| e.into_network_error())?;
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(NetworkError::ServerError {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await.map_err(|e| e.into_network_error())?;
    serde_json::from_str(&body).map_err(|e| NetworkError::InvalidResponse(e.to_string()))
}
