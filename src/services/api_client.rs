// ============================================================================
// API CLIENT - Gateway HTTP (Stateless salvo el token)
// ============================================================================
// - Adjunta `Authorization: Bearer <access>` si hay token guardado
// - 401 → ejecuta el handler de logout global ANTES de devolver el error
// - Sin reintentos
// ============================================================================

use std::rc::Rc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::services::error::ApiError;
use crate::services::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::services::{AuthApi, CompanyApi, EmployeeApi};
use crate::utils::storage::TokenStore;

/// Capacidad de logout forzado que se inyecta al construir el gateway
pub type UnauthorizedHandler = Rc<dyn Fn()>;

/// Cliente API - SOLO comunicación HTTP
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    timeout: Duration,
    transport: Rc<dyn Transport>,
    tokens: TokenStore,
    on_unauthorized: UnauthorizedHandler,
}

impl HttpGateway {
    pub fn new(
        config: &AppConfig,
        transport: Rc<dyn Transport>,
        tokens: TokenStore,
        on_unauthorized: UnauthorizedHandler,
    ) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            timeout: config.request_timeout(),
            transport,
            tokens,
            on_unauthorized,
        }
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn company(&self) -> CompanyApi<'_> {
        CompanyApi::new(self)
    }

    pub fn employee(&self) -> EmployeeApi<'_> {
        EmployeeApi::new(self)
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::Get, path, None).await?;
        parse_json(&response)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::Post, path, Some(encode(body)?)).await?;
        parse_json(&response)
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::Patch, path, Some(encode(body)?)).await?;
        parse_json(&response)
    }

    /// POST cuyo cuerpo de respuesta no interesa (p.ej. blacklist del refresh)
    pub(crate) async fn post_discard<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::Post, path, Some(encode(body)?)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, path, None).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = HttpRequest::new(method, url)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json");

        // Sin token la request sale igual: el servidor decide
        if let Some(token) = self.tokens.access_token() {
            request = request.with_header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.with_body(body);
        }

        log::debug!("🌐 [HTTP] {} {}", method.as_str(), path);

        let response = match self.transport.send(request, self.timeout).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ [HTTP] {} {}: {}", method.as_str(), path, e);
                return Err(e);
            }
        };

        if response.status == 401 {
            log::warn!("🔒 [HTTP] 401 en {} {} → logout forzado", method.as_str(), path);
            (self.on_unauthorized)();
            return Err(ApiError::Unauthorized { body: parse_body(&response.body) });
        }

        if !response.is_success() {
            log::warn!("⚠️ [HTTP] {} {} → HTTP {}", method.as_str(), path, response.status);
            return Err(ApiError::Status {
                status: response.status,
                body: parse_body(&response.body),
            });
        }

        Ok(response)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))
}
