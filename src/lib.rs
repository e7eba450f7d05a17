// ============================================================================
// HR CONSOLE - CAPA DE ESTADO MVVM (RUST PURO)
// ============================================================================
// Arquitectura MVVM:
// - ViewModels: Lógica de negocio (login, CRUD, restauración de sesión)
// - Services: SOLO comunicación API (gateway + transporte por plataforma)
// - State: Stores con Rc<RefCell> + notificaciones
// - Models: Estructuras compartidas con backend
// - Routing: Permisos por rol y redirecciones
// ============================================================================

pub mod app;
pub mod config;
pub mod models;
pub mod routing;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

pub use app::AdminConsole;
pub use config::{AppConfig, CONFIG};
pub use services::ApiError;

/// Inicializa el logger de la plataforma. Llamadas repetidas no hacen nada.
pub fn init_logging(config: &AppConfig) {
    if !config.is_logging_enabled() {
        return;
    }

    #[cfg(target_arch = "wasm32")]
    {
        let level = if config.is_production() { log::Level::Info } else { log::Level::Debug };
        if log::max_level() == log::LevelFilter::Off {
            wasm_logger::init(wasm_logger::Config::new(level));
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let default_filter = if config.is_production() { "info" } else { "debug" };
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .try_init();
    }
}

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::{init_logging, AdminConsole, CONFIG};

    // Instancia global de la consola
    thread_local! {
        static CONSOLE: RefCell<Option<AdminConsole>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        // Inicializar panic hook para mejor debugging
        console_error_panic_hook::set_once();
        init_logging(&CONFIG);
        log::info!("🚀 HR Console - Rust + MVVM");

        let console = AdminConsole::new(&CONFIG);

        // Deep link: se evalúa ya y otra vez cuando se restaure la sesión
        let initial_path = web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string());
        console.navigate(&initial_path);

        let session = console.session.clone();
        console.scope().spawn(async move { session.restore_session().await });

        CONSOLE.with(|cell| {
            *cell.borrow_mut() = Some(console);
        });
        Ok(())
    }
}
