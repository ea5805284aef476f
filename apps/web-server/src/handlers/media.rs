//! Serves uploaded post images.

use actix_web::{HttpResponse, web};
use file_format::FileFormat;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /media/{path}
pub async fn serve(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let content = state
        .media
        .open(&path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("media {} not found", path)))?;

    let media_type = FileFormat::from_bytes(&content).media_type();
    Ok(HttpResponse::Ok().content_type(media_type).body(content))
}
