use std::collections::HashMap;

use axum::extract::Multipart;

use crate::api::errors::ApiError;

pub(crate) struct UploadItem {
    pub(crate) filename: String,
    pub(crate) bytes: Vec<u8>,
}

/// Buffered multipart form: text fields by name plus repeated file fields.
/// File parts submitted with an empty filename (an untouched browser file
/// input) are dropped, matching how the submission forms behave.
#[derive(Default)]
pub(crate) struct FormData {
    texts: HashMap<String, String>,
    files: HashMap<String, Vec<UploadItem>>,
}

impl FormData {
    pub(crate) async fn collect(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(|value| value.to_string()) {
                Some(filename) => {
                    if filename.is_empty() {
                        continue;
                    }
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
                        .to_vec();
                    form.files.entry(name).or_default().push(UploadItem { filename, bytes });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|_| ApiError::BadRequest("Invalid form field".to_string()))?;
                    form.texts.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub(crate) fn text(&self, name: &str) -> &str {
        self.texts.get(name).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn take_files(&mut self, name: &str) -> Vec<UploadItem> {
        self.files.remove(name).unwrap_or_default()
    }
}
