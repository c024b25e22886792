// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::GeoRecord;
use crate::utils::errors::{Classify, ErrorKind};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("No geolocation data for {0}")]
    NotFound(String),
    #[error("Timeout")]
    Timeout,
}

impl Classify for LookupError {
    fn kind(&self) -> ErrorKind {
        match self {
            LookupError::NotFound(_) => ErrorKind::NotFound,
            LookupError::Network(_) | LookupError::Timeout => ErrorKind::Network,
        }
    }
}

#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Geolocation of the caller's own public address
    async fn fetch_self(&self) -> Result<GeoRecord, LookupError>;

    /// Geolocation of the given address
    async fn fetch_by_ip(&self, ip: &str) -> Result<GeoRecord, LookupError>;

    /// Get the name of the provider
    fn name(&self) -> &'static str;
}
