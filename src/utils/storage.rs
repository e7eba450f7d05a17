// ============================================================================
// STORAGE - Persistencia de tokens de sesión
// ============================================================================
// En el navegador se usa localStorage (valores en crudo, sin JSON, para que
// coincidan con lo que ya guarda el frontend web). En nativo y en tests se
// usa un mapa en memoria.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::utils::constants::{STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_REFRESH_TOKEN};

#[derive(Debug, Error)]
#[error("Storage error: {0}")]
pub struct StorageError(pub String);

/// Almacenamiento clave/valor durable
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// localStorage del navegador
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw().get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|_| StorageError(format!("No se pudo guardar '{}' en localStorage", key)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|_| StorageError(format!("No se pudo eliminar '{}' de localStorage", key)))
    }
}

/// Storage en memoria (nativo / tests)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage por defecto según la plataforma
pub fn default_storage() -> Rc<dyn KeyValueStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStorage::new())
    }
}

/// Tokens de sesión (access + refresh) sobre un storage compartido
#[derive(Clone)]
pub struct TokenStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl TokenStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage
            .get_item(STORAGE_KEY_ACCESS_TOKEN)
            .filter(|token| !token.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage
            .get_item(STORAGE_KEY_REFRESH_TOKEN)
            .filter(|token| !token.is_empty())
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }

    /// Guardar el par emitido por el login
    pub fn store_pair(&self, access: &str, refresh: &str) -> Result<(), StorageError> {
        self.storage.set_item(STORAGE_KEY_ACCESS_TOKEN, access)?;
        self.storage.set_item(STORAGE_KEY_REFRESH_TOKEN, refresh)
    }

    pub fn store_access(&self, access: &str) -> Result<(), StorageError> {
        self.storage.set_item(STORAGE_KEY_ACCESS_TOKEN, access)
    }

    /// Borrar ambos tokens. Nunca falla: los errores solo se loguean
    pub fn clear(&self) {
        for key in [STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_REFRESH_TOKEN] {
            if let Err(e) = self.storage.remove_item(key) {
                log::warn!("⚠️ [STORAGE] {}", e);
            }
        }
    }
}
