use axum::http::HeaderValue;
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, create_router};
use intake_core::{
    CoreConfig, business_offset_from_env_value, constants::DEFAULT_CUSTOMER_DATA_DIR,
};

/// Builds the CORS layer from a comma-separated origin list.
///
/// Unset or blank means permissive CORS.
fn cors_layer(allowed_origins: Option<String>) -> anyhow::Result<CorsLayer> {
    let origins: Vec<String> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Main entry point for the customer intake service
///
/// Serves the REST API (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `INTAKE_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `CUSTOMER_DATA_DIR`: Directory for customer data (default: "customer_data", created if missing)
/// - `BUSINESS_UTC_OFFSET`: Fixed offset for calendar days and business hours (default: "-08:00")
/// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins; permissive when unset
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake_run=info".parse()?)
                .add_directive("intake_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("INTAKE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let customer_data_dir = std::env::var("CUSTOMER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CUSTOMER_DATA_DIR));
    std::fs::create_dir_all(&customer_data_dir)?;

    let business_offset =
        business_offset_from_env_value(std::env::var("BUSINESS_UTC_OFFSET").ok())?;
    let cfg = CoreConfig::new(customer_data_dir, business_offset)?;
    let cors = cors_layer(std::env::var("CORS_ALLOWED_ORIGINS").ok())?;

    tracing::info!(
        data_dir = %cfg.customer_data_dir().display(),
        offset = %cfg.business_offset(),
        "++ Starting customer intake REST on {}",
        rest_addr
    );

    let app = create_router(AppState::from_config(&cfg), cors);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_origin_list_and_blank() {
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some(" , ".into())).is_ok());
        assert!(cors_layer(Some("https://example.com, https://admin.example.com".into())).is_ok());
    }

    #[test]
    fn cors_rejects_unencodable_origin() {
        assert!(cors_layer(Some("https://bad\norigin".into())).is_err());
    }
}
