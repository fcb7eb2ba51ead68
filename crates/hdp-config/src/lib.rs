//! # hdp-config
//!
//! TOML and environment configuration for the HDP risk monitor.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use hdp_config::HdpConfig;
//!
//! let config = HdpConfig::load(Some(Path::new("config/hdp.toml")))?;
//! println!("scoring endpoint: {}", config.remote.endpoint());
//! ```
//!
//! ## Environment
//!
//! `HDP_API_BASE_URL` replaces `remote.base_url`; `HDP_REMOTE_TIMEOUT_MS`
//! replaces `remote.timeout_ms`. Environment always wins over the file.

pub mod config;

pub use config::{EvaluationConfig, HdpConfig, RemoteConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
