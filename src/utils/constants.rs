/// URL base del API
/// Configurada en tiempo de compilación:
/// - Desarrollo: http://localhost:8000 (por defecto)
/// - Producción: via API_BASE_URL (ver build.rs / .env)
pub const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Claves de localStorage (mismo formato que el frontend web existente)
pub const STORAGE_KEY_ACCESS_TOKEN: &str = "authToken";
pub const STORAGE_KEY_REFRESH_TOKEN: &str = "refreshToken";

/// Timeout por defecto de cada request HTTP
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Mensaje de último recurso cuando un error no trae nada utilizable
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";
