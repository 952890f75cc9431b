//! Upload sources over files picked through an `<input type="file">`.

#[cfg(target_arch = "wasm32")]
mod imp {
    use std::rc::Rc;

    use js_sys::Uint8Array;
    use store_host::{UploadFuture, UploadSource};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{File, FileList};

    #[derive(Debug, Clone)]
    /// Upload source reading a browser `File` into memory.
    pub struct WebUploadSource {
        file: File,
    }

    impl WebUploadSource {
        /// Wraps a picked file.
        pub fn new(file: File) -> Self {
            Self { file }
        }
    }

    impl UploadSource for WebUploadSource {
        fn name(&self) -> String {
            self.file.name()
        }

        fn read_bytes(&self) -> UploadFuture<'_, Result<Vec<u8>, String>> {
            Box::pin(async move {
                let buffer = JsFuture::from(self.file.array_buffer())
                    .await
                    .map_err(|err| format!("reading `{}` failed: {err:?}", self.file.name()))?;
                Ok(Uint8Array::new(&buffer).to_vec())
            })
        }
    }

    /// Converts every file of a picker selection into an upload source.
    pub fn upload_sources(files: &FileList) -> Vec<Rc<dyn UploadSource>> {
        (0..files.length())
            .filter_map(|idx| files.get(idx))
            .map(|file| Rc::new(WebUploadSource::new(file)) as Rc<dyn UploadSource>)
            .collect()
    }
}

#[cfg(target_arch = "wasm32")]
pub use imp::{upload_sources, WebUploadSource};
