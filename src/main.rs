use std::net::SocketAddr;

use tracing::info;

use categodo::cli::{self, Command};
use categodo::{config::Config, create_app, db, AppState};

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("resolving configuration");

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(cli::log_filter(config.debug, rust_log.as_deref()))
        .init();

    let command = Command::parse(std::env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err}; usage: categodo [serve|init-db]");
        std::process::exit(2);
    });

    if command == Command::InitDb {
        cli::init_db(&config).expect("creating database");
        info!(database = %config.database_file, "Initialized database");
        return;
    }

    let db = db::init_db(&config.database_file).expect("initializing database");
    info!(database = %config.database_file, "Opened database");

    let state = AppState::new(db.clone(), config.template_folder.clone());
    let app = create_app(state);
    let addr = SocketAddr::new(config.host, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|err| panic!("binding {addr}: {err}"));

    info!(debug = config.debug, "running on {addr:?}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("failed serving");

    if let Err(err) = db::release(db) {
        tracing::error!(error = %err, "Failed to close database");
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
