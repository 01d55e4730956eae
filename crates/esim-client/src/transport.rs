use crate::{ApiError, Result, SessionStore};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Bound so a synthetic fallback is reached in bounded time instead of
/// hanging on a dead backend.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Outbound HTTP with bearer injection and session invalidation.
///
/// On a 401 the transport clears the session store before propagating
/// `ApiError::Unauthorized`; it never retries or refreshes on its own.
pub struct Transport {
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

impl Transport {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            session,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.dispatch(self.http.get(url)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.dispatch(self.http.post(url).json(body)).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match self.session.token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Local invalidation only; the caller routes to re-auth.
            if let Err(e) = self.session.clear().await {
                warn!(error = %e, "failed to clear session after 401");
            }
            return Err(ApiError::Unauthorized);
        }
        if status.is_server_error() {
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }
        if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Client {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
