// ABOUTME: Re-exports the unified error types from foodgram-core
// ABOUTME: Keeps AppError and ErrorCode identical across the workspace crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub use foodgram_core::errors::*;
