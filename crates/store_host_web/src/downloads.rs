//! Download adapter that saves bytes through a temporary Blob URL.

use store_host::{DownloadFuture, DownloadService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Browser download adapter.
pub struct WebDownloadService;

impl DownloadService for WebDownloadService {
    fn offer<'a>(
        &'a self,
        file_name: &'a str,
        bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::offer_download(file_name, bytes).await })
    }
}
