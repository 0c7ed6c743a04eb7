//! Error Types
//!
//! This module defines the error types used throughout the viewer core.
//!
//! # Overview
//!
//! The main error type [`Error`] covers the failure modes of loading and
//! hosting an animated actor:
//! - Asset resolution and parsing errors
//! - I/O and settings errors
//! - Async task and event loop errors
//!
//! Advancing an animation player or motion controller before any actor is
//! installed is *not* an error. Those calls are silent no-ops.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use marionette::errors::{Error, Result};
//!
//! fn resolve(name: &str) -> Result<()> {
//!     Err(Error::AssetNotFound(name.to_string()))
//! }
//! ```

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset name does not resolve to a packaged asset.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The asset exists but could not be turned into an actor.
    #[error("Malformed asset: {0}")]
    MalformedAsset(String),

    /// No registered parser handles this file extension.
    #[error("Unsupported asset format: {0}")]
    UnsupportedFormat(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error (settings files, glTF extras).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error (embedded `data:` buffers).
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Settings parsed but describe an unusable configuration.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ========================================================================
    // Async & Platform Errors
    // ========================================================================
    /// A load task panicked or was cancelled.
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// The load runtime could not be started.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
