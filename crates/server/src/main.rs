mod error;
mod remote_image;
mod routes;

use axum::{
    Router,
    extract::FromRef,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use stockroom_core::CurrencyTable;
use stockroom_runtime_config::{StockroomConfig, config_path};
use stockroom_store::Store;

use remote_image::ImageFetcher;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub currencies: Arc<CurrencyTable>,
    pub images: ImageFetcher,
}

impl FromRef<AppState> for Arc<Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<CurrencyTable> {
    fn from_ref(state: &AppState) -> Self {
        state.currencies.clone()
    }
}

/// Routes mounted under `/api`.
fn api_router() -> Router<AppState> {
    use routes::{
        attachments, companies, currencies, health, manufacturer_parts, parameters, price_breaks,
        supplier_parts,
    };

    Router::new()
        .route("/health", get(health::health))
        .route("/currencies", get(currencies::list))
        // Companies
        .route("/company/", get(companies::list).post(companies::create))
        .route(
            "/company/{id}/",
            get(companies::get)
                .put(companies::update)
                .patch(companies::patch)
                .delete(companies::delete),
        )
        .route(
            "/company/attachment/",
            get(attachments::list_company).post(attachments::create_company),
        )
        .route(
            "/company/attachment/{id}/",
            get(attachments::get_company).delete(attachments::delete_company),
        )
        // Manufacturer parts
        .route(
            "/company/part/manufacturer/",
            get(manufacturer_parts::list).post(manufacturer_parts::create),
        )
        .route(
            "/company/part/manufacturer/{id}/",
            get(manufacturer_parts::get)
                .put(manufacturer_parts::update)
                .patch(manufacturer_parts::patch)
                .delete(manufacturer_parts::delete),
        )
        .route(
            "/company/part/manufacturer/attachment/",
            get(attachments::list_manufacturer_part).post(attachments::create_manufacturer_part),
        )
        .route(
            "/company/part/manufacturer/attachment/{id}/",
            get(attachments::get_manufacturer_part).delete(attachments::delete_manufacturer_part),
        )
        .route(
            "/company/part/manufacturer/parameter/",
            get(parameters::list).post(parameters::create),
        )
        .route(
            "/company/part/manufacturer/parameter/{id}/",
            get(parameters::get)
                .put(parameters::update)
                .patch(parameters::patch)
                .delete(parameters::delete),
        )
        // Supplier parts
        .route(
            "/company/part/",
            get(supplier_parts::list).post(supplier_parts::create),
        )
        .route(
            "/company/part/{id}/",
            get(supplier_parts::get)
                .put(supplier_parts::update)
                .patch(supplier_parts::patch)
                .delete(supplier_parts::delete),
        )
        .route(
            "/company/price-break/",
            get(price_breaks::list).post(price_breaks::create),
        )
        .route(
            "/company/price-break/{id}/",
            get(price_breaks::get)
                .put(price_breaks::update)
                .patch(price_breaks::patch)
                .delete(price_breaks::delete),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom_server=info,tower_http=info".into()),
        )
        .init();

    let env = |name: &str| std::env::var(name).ok();
    let path = config_path(env);
    let mut config = StockroomConfig::load(&path)?;
    config.apply_env(env)?;
    tracing::info!("config: {}", path.display());

    let currencies = config.currency.table()?;
    tracing::info!(
        "currencies: {} (default {})",
        currencies.codes().join(", "),
        currencies.default_code()
    );

    let data_dir = &config.server.data_dir;
    tracing::info!("data directory: {}", data_dir.display());
    let store = Store::open(data_dir)?;
    tracing::info!("database initialized");

    if config.remote_images.enabled {
        tracing::info!(
            "remote image download enabled (max {} MB)",
            config.remote_images.max_size_mb
        );
    }
    let images = ImageFetcher::new(config.remote_images.clone())?;
    let media_root = store.media_root().to_path_buf();

    let state = AppState {
        store: Arc::new(store),
        currencies: Arc::new(currencies),
        images,
    };

    let app = Router::new()
        .nest("/api", api_router())
        .nest_service("/media", ServeDir::new(media_root))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    tracing::info!("starting server at {}", config.server.base_url);

    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.server.port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
