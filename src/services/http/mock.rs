// Transporte guionizado para tests: cada request consume la siguiente
// respuesta esperada, en orden.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;

use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::services::error::ApiError;

enum Reply {
    Ready(Result<HttpResponse, ApiError>),
    Deferred(oneshot::Receiver<Result<HttpResponse, ApiError>>),
}

struct Expectation {
    method: Method,
    path: String,
    reply: Reply,
}

#[derive(Default)]
pub struct MockTransport {
    expectations: RefCell<VecDeque<Expectation>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Reply::Ready(Ok(HttpResponse::new(status, body))));
        self
    }

    pub fn expect_error(&self, method: Method, path: &str, error: ApiError) -> &Self {
        self.push(method, path, Reply::Ready(Err(error)));
        self
    }

    /// La respuesta llega cuando el test la envía por el canal devuelto
    pub fn expect_deferred(
        &self,
        method: Method,
        path: &str,
    ) -> oneshot::Sender<Result<HttpResponse, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Reply::Deferred(rx));
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.expectations.borrow_mut().push_back(Expectation {
            method,
            path: path.to_string(),
            reply,
        });
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest, _timeout: Duration) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());

        let expectation = self.expectations.borrow_mut().pop_front();
        let Some(expectation) = expectation else {
            panic!("unexpected request: {} {}", request.method.as_str(), request.url);
        };
        assert_eq!(expectation.method, request.method, "method for {}", request.url);
        assert!(
            request.url.ends_with(&expectation.path),
            "expected path {} but got {}",
            expectation.path,
            request.url
        );

        match expectation.reply {
            Reply::Ready(result) => result,
            Reply::Deferred(rx) => rx.await.unwrap_or(Err(ApiError::Cancelled)),
        }
    }
}
