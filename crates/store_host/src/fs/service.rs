//! Content-store transport contract.

use std::{future::Future, pin::Pin};

use super::types::{StoreRequest, StoreResponse};
use crate::error::TransportError;

/// Object-safe boxed future used by [`StoreTransport`].
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that delivers one request to the content store and returns its raw answer.
///
/// Implementations attach `request.credential` under the configured credential header, bound the
/// request by the configured timeout, and never retry.
pub trait StoreTransport {
    /// Sends `request` and resolves with the store's status and body.
    fn send<'a>(
        &'a self,
        request: StoreRequest,
    ) -> StoreFuture<'a, Result<StoreResponse, TransportError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Transport for hosts without network access.
pub struct NoopStoreTransport;

impl StoreTransport for NoopStoreTransport {
    fn send<'a>(
        &'a self,
        request: StoreRequest,
    ) -> StoreFuture<'a, Result<StoreResponse, TransportError>> {
        Box::pin(async move {
            Err(TransportError::Unsupported(format!(
                "{} {}",
                request.method.as_str(),
                request.path
            )))
        })
    }
}
