//! Optional position capability used to bias provider searches.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::GeoCoordinate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the user's current position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoCoordinate, LocationError>;
}

/// Always reports the same position
pub struct FixedLocation(pub GeoCoordinate);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<GeoCoordinate, LocationError> {
        Ok(self.0)
    }
}

/// Position taken from `HEALTH_ASSIST_LATITUDE` / `HEALTH_ASSIST_LONGITUDE`
pub struct EnvLocation;

pub const LATITUDE_VAR: &str = "HEALTH_ASSIST_LATITUDE";
pub const LONGITUDE_VAR: &str = "HEALTH_ASSIST_LONGITUDE";

#[async_trait]
impl LocationProvider for EnvLocation {
    async fn current_position(&self) -> Result<GeoCoordinate, LocationError> {
        position_from_lookup(|key| std::env::var(key).ok())
    }
}

/// Read a coordinate pair through `lookup`; missing or unparsable values are `Unavailable`
fn position_from_lookup<F>(lookup: F) -> Result<GeoCoordinate, LocationError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| -> Result<f64, LocationError> {
        let raw = lookup(key).ok_or_else(|| LocationError::Unavailable(format!("{} not set", key)))?;
        raw.trim()
            .parse::<f64>()
            .map_err(|e| LocationError::Unavailable(format!("{}: {}", key, e)))
    };
    Ok(GeoCoordinate::new(read(LATITUDE_VAR)?, read(LONGITUDE_VAR)?))
}
