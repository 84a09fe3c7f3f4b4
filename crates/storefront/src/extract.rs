//! Request extractors.
//!
//! Both wrappers turn axum's plain-text rejections into [`AppError::Validation`],
//! so malformed input produces the same `{"error": ...}` shape as every other
//! failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` with an [`AppError`] rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);

/// `axum::extract::Path` with an [`AppError`] rejection, e.g. for a
/// non-numeric id in `/api/cart/{id}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ValidPath<T>(pub T);
