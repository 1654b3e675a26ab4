// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration loaded from environment variables

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::vision::ClassifierModelConfig;

/// Runtime configuration for the prediction service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// HTTP port
    pub port: u16,
    /// Path to the ONNX classifier
    pub model_path: String,
    /// Timeout for a single image download, in seconds
    pub fetch_timeout_secs: u64,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("API_HOST", defaults.host),
            port: env_or("API_PORT", defaults.port),
            model_path: env::var("CLASSIFIER_MODEL_PATH").unwrap_or(defaults.model_path),
            fetch_timeout_secs: env_or("IMAGE_FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs),
            intra_threads: env_or("ONNX_INTRA_THREADS", defaults.intra_threads),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("API port must be greater than 0".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("Image fetch timeout must be greater than 0".to_string());
        }
        if self.intra_threads == 0 {
            return Err("ONNX intra threads must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn model_config(&self) -> ClassifierModelConfig {
        ClassifierModelConfig {
            model_path: Some(self.model_path.clone()),
            intra_threads: self.intra_threads,
            ..Default::default()
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    parse_or_default(key, env::var(key).ok().as_deref(), default)
}

/// Parse `raw`, keeping `default` (with a warning) when it is malformed
fn parse_or_default<T>(key: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, value, default);
            default
        }),
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            model_path: "./models/resnet50-plantvillage.onnx".to_string(),
            fetch_timeout_secs: 10,
            intra_threads: 4,
        }
    }
}
