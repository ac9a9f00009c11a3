// ABOUTME: JSON request body extractor that rejects through the application error type
// ABOUTME: Malformed or mistyped bodies become 400 INVALID_INPUT with per-field details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` with rejections rendered as [`AppError`]
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
