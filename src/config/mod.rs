// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Exposes ServerConfig and its typed sub-configurations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Configuration is read once at startup from environment variables.

/// Environment variable parsing and typed configuration
pub mod environment;

pub use environment::{
    AppBehaviorConfig, AuthConfig, DatabaseConfig, DatabaseUrl, Environment, HttpConfig,
    LogLevel, MediaConfig, ServerConfig,
};
