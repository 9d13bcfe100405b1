use health_assist::geolocation::{EnvLocation, LocationProvider};
use health_assist::{GatewayConfig, GeminiGateway, HealthAssistant, ProviderQuery, RiskProfile};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "health_assist=debug,care_flow=debug".into());

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting live check against the model endpoint");

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            error!("Set GEMINI_API_KEY to run the live check");
            return Ok(());
        }
    };
    info!(?config, "Loaded gateway configuration");

    let gateway = GeminiGateway::new(config)?;
    let location: Arc<dyn LocationProvider> = Arc::new(EnvLocation);
    let assistant = HealthAssistant::new(gateway, Some(location));

    // Symptom analysis
    let snapshot = assistant
        .symptoms
        .submit("Throbbing headache on one side, sensitivity to light, mild nausea".to_string())
        .await?;
    match (&snapshot.result, &snapshot.error) {
        (Some(response), _) => {
            for entry in &response.analysis {
                info!(
                    condition = %entry.condition,
                    probability = %entry.probability,
                    urgency = %entry.urgency,
                    "Possible condition"
                );
            }
            info!(disclaimer = %response.disclaimer, "Symptom analysis done");
        }
        (None, Some(message)) => warn!(status = %snapshot.status, "{}", message),
        (None, None) => warn!(status = %snapshot.status, "No symptom result"),
    }

    // Risk prediction
    let profile = RiskProfile {
        age: "52".to_string(),
        weight_kg: "88".to_string(),
        height_cm: "178".to_string(),
        family_history: "Father had type 2 diabetes".to_string(),
        ..RiskProfile::default()
    };
    let snapshot = assistant.risk.submit(profile).await?;
    match (&snapshot.result, &snapshot.error) {
        (Some(prediction), _) => {
            let (filled, remaining) = prediction.gauge();
            info!(
                score = prediction.risk_score,
                level = %prediction.risk_level,
                band = ?prediction.band(),
                gauge_filled = filled,
                gauge_remaining = remaining,
                "Risk prediction done"
            );
            for recommendation in &prediction.recommendations {
                info!("Recommendation: {}", recommendation);
            }
        }
        (None, Some(message)) => warn!(status = %snapshot.status, "{}", message),
        (None, None) => warn!(status = %snapshot.status, "No risk result"),
    }

    // Provider search
    let query = match std::env::var("LIVE_CHECK_LOCATION") {
        Ok(location) => ProviderQuery::new("Cardiologist").near(location),
        Err(_) => ProviderQuery::new("Cardiologist"),
    };
    let snapshot = assistant.providers.submit(query).await?;
    match (&snapshot.result, &snapshot.error) {
        (Some(result), _) => {
            info!(query = %result.query, "Provider summary:\n{}", result.summary);
            for citation in result.displayable() {
                info!(
                    title = %citation.title,
                    uri = %citation.uri,
                    place = citation.is_place,
                    snippet = citation.snippet.as_deref().unwrap_or(""),
                    "Source"
                );
            }
        }
        (None, Some(message)) => warn!(status = %snapshot.status, "{}", message),
        (None, None) => warn!(status = %snapshot.status, "No provider result"),
    }

    info!("Live check finished");
    Ok(())
}
