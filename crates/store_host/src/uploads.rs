//! Local file sources selected by the user for upload.

use std::{future::Future, pin::Pin};

/// Object-safe boxed future used by [`UploadSource`].
pub type UploadFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One user-selected local file.
pub trait UploadSource {
    /// File name, used as the last segment of the destination path.
    fn name(&self) -> String;

    /// Reads the whole file into memory.
    fn read_bytes(&self) -> UploadFuture<'_, Result<Vec<u8>, String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// In-memory upload source.
pub struct MemoryUploadSource {
    name: String,
    contents: Result<Vec<u8>, String>,
}

impl MemoryUploadSource {
    /// Creates a source whose read yields `bytes`.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: Ok(bytes.into()),
        }
    }

    /// Creates a source whose read fails with `reason`.
    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: Err(reason.into()),
        }
    }
}

impl UploadSource for MemoryUploadSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read_bytes(&self) -> UploadFuture<'_, Result<Vec<u8>, String>> {
        let contents = self.contents.clone();
        Box::pin(async move { contents })
    }
}
