use std::collections::HashMap;

use axum::extract::Multipart;

use furfect_types::media::InlineImage;

use crate::error::{ApiError, ApiResult};

/// A fully buffered multipart form: text fields plus any non-empty files.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, InlineImage>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("Malformed upload: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Malformed upload: {}", e)))?;
                if !data.is_empty() {
                    form.files
                        .insert(name, InlineImage::new(content_type, data.to_vec()));
                }
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Malformed upload: {}", e)))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// A text field, treating empty values as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<InlineImage> {
        self.files.remove(name)
    }
}
