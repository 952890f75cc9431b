//! Save-to-disk contract for downloading store content.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`DownloadService`].
pub type DownloadFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that hands raw bytes to the user as a downloaded file.
pub trait DownloadService {
    /// Offers `bytes` for download under `file_name`.
    fn offer<'a>(
        &'a self,
        file_name: &'a str,
        bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Download service for hosts that cannot save files.
pub struct NoopDownloadService;

impl DownloadService for NoopDownloadService {
    fn offer<'a>(
        &'a self,
        file_name: &'a str,
        _bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move { Err(format!("downloads are unavailable for `{file_name}`")) })
    }
}

#[derive(Debug, Clone, Default)]
/// Download service that keeps offered files in memory.
pub struct MemoryDownloadService {
    inner: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
}

impl MemoryDownloadService {
    /// Returns every offered file as `(name, bytes)`.
    pub fn offered(&self) -> Vec<(String, Vec<u8>)> {
        self.inner.borrow().clone()
    }
}

impl DownloadService for MemoryDownloadService {
    fn offer<'a>(
        &'a self,
        file_name: &'a str,
        bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(())
        })
    }
}
