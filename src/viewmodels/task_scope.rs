// ============================================================================
// TASK SCOPE - Cancelación de operaciones ligadas a una vista
// ============================================================================
// Al desmontar una vista se suelta su scope y se abortan sus futures en vuelo.
// La operación abortada no liquida nada; su `Ticket` se suelta con el future
// y el loading se libera igual.
// ============================================================================

use std::cell::RefCell;
use std::future::Future;

use futures::future::{AbortHandle, Abortable, Aborted};
use futures::FutureExt;

use crate::services::error::ApiError;

#[derive(Default)]
pub struct TaskScope {
    handles: RefCell<Vec<AbortHandle>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Envuelve una operación para que el scope pueda abortarla
    pub fn run<T, F>(&self, operation: F) -> impl Future<Output = Result<T, ApiError>>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        {
            let mut handles = self.handles.borrow_mut();
            handles.retain(|h| !h.is_aborted());
            handles.push(handle);
        }
        Abortable::new(operation, registration).map(|result| match result {
            Ok(inner) => inner,
            Err(Aborted) => {
                log::debug!("🛑 [TASK] Operación cancelada");
                Err(ApiError::Cancelled)
            }
        })
    }

    /// Lanza la operación en el event loop del navegador
    #[cfg(target_arch = "wasm32")]
    pub fn spawn<T, F>(&self, operation: F)
    where
        T: 'static,
        F: Future<Output = Result<T, ApiError>> + 'static,
    {
        let task = self.run(operation);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = task.await {
                log::debug!("⚠️ [TASK] {}", e);
            }
        });
    }

    pub fn cancel_all(&self) {
        for handle in self.handles.borrow_mut().drain(..) {
            handle.abort();
        }
    }

    pub fn active_tasks(&self) -> usize {
        self.handles.borrow().iter().filter(|h| !h.is_aborted()).count()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    #[test]
    fn test_completed_operation_passes_through() {
        let scope = TaskScope::new();
        let value = block_on(scope.run(async { Ok::<_, ApiError>(7) }));
        assert_eq!(value, Ok(7));
    }

    #[test]
    fn test_dropping_scope_cancels_pending_operation() {
        let (_tx, rx) = oneshot::channel::<u32>();
        let scope = TaskScope::new();
        let task = scope.run(async move { rx.await.map_err(|_| ApiError::Cancelled) });
        assert_eq!(scope.active_tasks(), 1);

        drop(scope);
        assert_eq!(block_on(task), Err(ApiError::Cancelled));
    }
}
