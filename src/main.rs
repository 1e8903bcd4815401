use leavedesk::{
    app,
    config::{ConfigProvider, EnvVarProvider},
    InjectableServices,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let env_config_provider = EnvVarProvider::new(env::vars().collect());
    let config = env_config_provider.get_config().clone();

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(config.database_url.as_str())
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Failed to run migrations");

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("Failed to bind port");

    log::info!("leavedesk listening on port {}", config.port);

    let services = InjectableServices {
        config,
        db: db.clone(),
        store: None,
        twilio_address: None,
        sheets_address: None,
        google_token_uri: None,
    };

    axum::serve(listener, app(services).await)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    db.close().await;
    log::info!("leavedesk stopped");
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => log::info!("Received SIGINT, shutting down"),
            _ = sigterm.recv() => log::info!("Received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        log::info!("Received Ctrl+C, shutting down");
    }
}
