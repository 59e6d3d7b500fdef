//! Extractors whose rejections render as the standard failure envelope.
//!
//! Axum's own `Json`, `Path` and `Query` reject with plain-text bodies and
//! 415/422 statuses. These wrappers run the same extraction and turn any
//! rejection into a 400 [`AppError::BadRequest`](crate::error::AppError).

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Typed path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Typed query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
