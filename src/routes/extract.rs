use axum::extract::FromRequest;

use crate::types::AppError;

/// `Json` body extractor whose rejections render as [`AppError`] bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
