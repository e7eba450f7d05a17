// Transporte HTTP con implementaciones específicas por plataforma

pub mod transport;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

#[cfg(test)]
pub mod mock;

pub use transport::{HttpRequest, HttpResponse, Method, Transport};

use std::rc::Rc;

/// Transporte por defecto de la plataforma actual
pub fn default_transport() -> Rc<dyn Transport> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(web::FetchTransport::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(native::ReqwestTransport::new())
    }
}
