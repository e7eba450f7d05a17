// ============================================================================
// FETCH TRANSPORT - gloo-net sobre window.fetch (solo wasm32)
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;

use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::services::error::ApiError;

#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }

    fn builder(method: Method, url: &str) -> RequestBuilder {
        match method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Patch => Request::patch(url),
            Method::Delete => Request::delete(url),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse, ApiError> {
        let mut builder = Self::builder(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(format!("Request build error: {}", e)))?;

        let millis = timeout.as_millis().min(u32::MAX as u128) as u32;
        let send = Box::pin(built.send());
        let timer = Box::pin(TimeoutFuture::new(millis));

        match select(send, timer).await {
            Either::Left((result, _)) => {
                let response = result.map_err(|e| ApiError::Network(e.to_string()))?;
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| ApiError::Network(format!("Error leyendo respuesta: {}", e)))?;
                Ok(HttpResponse { status, body })
            }
            Either::Right(_) => {
                log::warn!("⏱️ [HTTP] Timeout ({}s): {} {}", timeout.as_secs(), request.method.as_str(), request.url);
                Err(ApiError::Timeout(timeout.as_secs()))
            }
        }
    }
}
