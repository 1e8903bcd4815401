use base64::{engine::general_purpose, Engine as _};
use leavedesk::{
    app,
    config::{Config, ConfigProvider, EnvVarProvider},
    InjectableServices,
};
use reqwest::{redirect::Policy, Client, RequestBuilder};
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::net::TcpListener;

// Nothing listens here, so an unmocked outbound call fails the request
const UNREACHABLE_ADDRESS: &str = "http://localhost:1313";

struct TestApp {
    pub address: String,
}

const SERVICE_ACCOUNT_KEY: &str = include_str!("fixtures/service_account_key.pem");

pub fn get_config() -> Config {
    let google_credentials = serde_json::json!({
        "type": "service_account",
        "client_email": "leavedesk@example.iam.gserviceaccount.com",
        "private_key": SERVICE_ACCOUNT_KEY,
        "token_uri": format!("{}/token", UNREACHABLE_ADDRESS),
    })
    .to_string();

    let vars: HashMap<String, String> = [
        ("AUTH", "warden:hunter2"),
        ("DATABASE_URL", "postgres://localhost/leavedesk_test"),
        ("TWILIO_ACCOUNT_SID", "AC_test"),
        ("TWILIO_AUTH_TOKEN", "twilio-test-token"),
        ("GOOGLE_CREDENTIALS", google_credentials.as_str()),
        ("SPREADSHEET_ID", "sheet-id"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();

    EnvVarProvider::new(vars).get_config().clone()
}

pub fn services(db: &PgPool) -> InjectableServices {
    InjectableServices {
        config: get_config(),
        db: db.clone(),
        store: None,
        twilio_address: None,
        sheets_address: None,
        google_token_uri: None,
    }
}

#[allow(dead_code)]
pub async fn get(
    path: &str,
    services: InjectableServices,
) -> Result<reqwest::Response, reqwest::Error> {
    let (client, url) = prepare(path, services).await;
    client.get(&url).send().await
}

#[allow(dead_code)]
pub async fn get_with_auth(
    path: &str,
    services: InjectableServices,
) -> Result<reqwest::Response, reqwest::Error> {
    let (client, url) = prepare(path, services).await;
    with_auth(client.get(&url)).send().await
}

#[allow(dead_code)]
pub async fn post(
    path: &str,
    form: &[(&str, &str)],
    services: InjectableServices,
) -> Result<reqwest::Response, reqwest::Error> {
    let (client, url) = prepare(path, services).await;
    client.post(&url).form(form).send().await
}

#[allow(dead_code)]
pub async fn post_with_auth(
    path: &str,
    form: &[(&str, &str)],
    services: InjectableServices,
) -> Result<reqwest::Response, reqwest::Error> {
    let (client, url) = prepare(path, services).await;
    with_auth(client.post(&url).form(form)).send().await
}

fn with_auth(request: RequestBuilder) -> RequestBuilder {
    request.header(
        "Authorization",
        format!(
            "Basic {}",
            general_purpose::STANDARD.encode(get_config().auth)
        ),
    )
}

async fn prepare(path: &str, mut services: InjectableServices) -> (Client, String) {
    if services.twilio_address.is_none() {
        services.twilio_address = Some(UNREACHABLE_ADDRESS.to_string());
    }

    if services.sheets_address.is_none() {
        services.sheets_address = Some(UNREACHABLE_ADDRESS.to_string());
    }

    let app_address = spawn_app(services).await.address;

    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client");

    (client, format!("{}{}", app_address, path))
}

async fn spawn_app(services: InjectableServices) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app(services).await.into_make_service())
            .await
            .unwrap();
    });

    TestApp { address }
}
