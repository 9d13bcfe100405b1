use std::sync::Arc;

use async_trait::async_trait;
use care_flow::{FlowError, Result, Task};
use tracing::{debug, info, warn};

use crate::gateway::GeminiGateway;
use crate::geolocation::LocationProvider;
use crate::models::{GeoCoordinate, NO_SUMMARY_FALLBACK, ProviderQuery, ProviderSearchResult};

pub struct ProviderSearchTask {
    gateway: GeminiGateway,
    location: Option<Arc<dyn LocationProvider>>,
}

impl ProviderSearchTask {
    pub fn new(gateway: GeminiGateway) -> Self {
        Self {
            gateway,
            location: None,
        }
    }

    pub fn with_location(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(provider);
        self
    }

    /// Best-effort position; only tried when no location text was given
    async fn resolve_coordinate(&self, query: &ProviderQuery) -> Option<GeoCoordinate> {
        if query.location_text().is_some() {
            return None;
        }
        let provider = self.location.as_ref()?;

        match provider.current_position().await {
            Ok(coordinate) => {
                debug!(task_id = %self.id(), "Using current position for search bias");
                Some(coordinate)
            }
            Err(e) => {
                warn!(task_id = %self.id(), "Geolocation denied or failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl Task for ProviderSearchTask {
    type Input = ProviderQuery;
    type Output = ProviderSearchResult;

    fn id(&self) -> &str {
        "provider_search"
    }

    fn validate(&self, query: &ProviderQuery) -> Result<()> {
        if query.specialty.trim().is_empty() {
            return Err(FlowError::InvalidInput(
                "Please enter a specialty or provider type".to_string(),
            ));
        }
        Ok(())
    }

    fn failure_message(&self) -> &str {
        "Failed to find doctors. Please try again."
    }

    async fn run(&self, query: ProviderQuery) -> Result<ProviderSearchResult> {
        let coordinate = self.resolve_coordinate(&query).await;
        let query_text = query.query_text();
        info!(
            task_id = %self.id(),
            query = %query_text,
            has_coordinate = coordinate.is_some(),
            "Running provider search"
        );

        let response = self
            .gateway
            .find_nearby_providers(&query_text, coordinate)
            .await?;

        Ok(ProviderSearchResult {
            query: query_text,
            coordinate,
            summary: response
                .text
                .unwrap_or_else(|| NO_SUMMARY_FALLBACK.to_string()),
            citations: response.citations,
        })
    }
}
