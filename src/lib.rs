pub mod auth;
pub mod config;
pub mod error;
pub mod google;
pub mod models;
pub mod phone;
pub mod routes;
pub mod sheets;
pub mod store;
pub mod twilio;

use crate::{
    config::Config,
    google::{TokenProvider, SPREADSHEETS_SCOPE},
    routes::*,
    sheets::SheetsClient,
    store::{MemoryStore, RequestStore},
    twilio::TwilioClient,
};

use axum::{
    routing::{get, post},
    Router,
};
use axum_template::engine::Engine;
use handlebars::{DirectorySourceOptions, Handlebars};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::services::ServeDir;

type AppEngine = Engine<Handlebars<'static>>;

const TWILIO_API_ADDRESS: &str = "https://api.twilio.com";
const SHEETS_API_ADDRESS: &str = "https://sheets.googleapis.com";

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: PgPool,
    pub engine: AppEngine,
    pub store: Arc<dyn RequestStore>,
    pub twilio: TwilioClient,
    pub sheets: SheetsClient,
}

pub struct InjectableServices {
    pub config: Config,
    pub db: PgPool,
    pub store: Option<Arc<dyn RequestStore>>,
    pub twilio_address: Option<String>,
    pub sheets_address: Option<String>,
    pub google_token_uri: Option<String>,
}

pub async fn app(services: InjectableServices) -> Router {
    let mut hbs = Handlebars::new();
    hbs.register_templates_directory(
        "templates",
        DirectorySourceOptions {
            tpl_extension: ".hbs".to_string(),
            hidden: false,
            temporary: false,
        },
    )
    .expect("Failed to register templates directory");

    // One HTTP client for every outbound call over the life of the process
    let client = reqwest::Client::new();

    let twilio = TwilioClient::new(
        client.clone(),
        services
            .twilio_address
            .unwrap_or_else(|| TWILIO_API_ADDRESS.to_string()),
        &services.config,
    );

    let mut credentials = services.config.google_credentials.clone();
    if let Some(token_uri) = services.google_token_uri {
        credentials.token_uri = token_uri;
    }

    let tokens = TokenProvider::new(client.clone(), &credentials, SPREADSHEETS_SCOPE)
        .expect("Unable to load the GOOGLE_CREDENTIALS private key");

    let sheets = SheetsClient::new(
        client,
        services
            .sheets_address
            .unwrap_or_else(|| SHEETS_API_ADDRESS.to_string()),
        tokens,
        &services.config,
    );

    let store = services
        .store
        .unwrap_or_else(|| Arc::new(MemoryStore::default()));

    Router::new()
        .route("/", get(get_panel).post(post_panel))
        .route("/webhook", post(post_webhook))
        .route("/approve", post(post_approve))
        .route("/admin/students", get(get_students).post(post_student))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(AppState {
            config: services.config,
            db: services.db,
            engine: Engine::from(hbs),
            store,
            twilio,
            sheets,
        })
}
