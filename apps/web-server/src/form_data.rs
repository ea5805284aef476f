//! Form body decoding for `application/x-www-form-urlencoded` and
//! `multipart/form-data` submissions.

use std::collections::HashMap;

use actix_web::{HttpRequest, http::header, web::Bytes};
use multer::{Constraints, SizeLimit};
use url::form_urlencoded;

use scribe_core::forms::{PostForm, UploadedFile};

use crate::middleware::error::AppError;

/// Upper bound for a whole form body, uploads included.
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

/// Decoded form fields. Repeated fields keep their first value.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn parse(req: &HttpRequest, body: Bytes) -> Result<Self, AppError> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            Self::multipart(content_type, body).await
        } else {
            Ok(Self::urlencoded(&body))
        }
    }

    pub fn urlencoded(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (name, value) in form_urlencoded::parse(body) {
            form.fields
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        form
    }

    async fn multipart(content_type: &str, body: Bytes) -> Result<Self, AppError> {
        let boundary = multer::parse_boundary(content_type)
            .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?;

        let constraints =
            Constraints::new().size_limit(SizeLimit::new().whole_stream(MAX_FORM_BYTES as u64));
        let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(body) });
        let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content = field.bytes().await.map_err(bad_multipart)?;
                    form.files.entry(name).or_insert(UploadedFile {
                        file_name,
                        content: content.to_vec(),
                    });
                }
                None => {
                    let text = field.text().await.map_err(bad_multipart)?;
                    form.fields.entry(name).or_insert(text);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// A checkbox: present and not explicitly off.
    pub fn flag(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .is_some_and(|v| !matches!(v.as_str(), "" | "0" | "false" | "off"))
    }

    pub fn into_post_form(mut self) -> PostForm {
        PostForm {
            text: self.text("text"),
            group: self.optional("group"),
            clear_image: self.flag("image-clear"),
            image: self.files.remove("image"),
        }
    }
}

fn bad_multipart(err: multer::Error) -> AppError {
    AppError::BadRequest(format!("invalid multipart body: {err}"))
}
