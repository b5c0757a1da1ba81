use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use bolso_import::{Classifier, RuleSet};
use bolso_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bolso_server=debug,tower_http=debug".into()),
        )
        .init();

    let db_path = std::env::var("BOLSO_DB").unwrap_or_else(|_| "bolso.db".to_string());
    let db = bolso_storage::create_db(Path::new(&db_path)).await?;

    // Classifier rules come from a TOML file when one is configured,
    // otherwise the built-in table.
    let rule_set = match std::env::var("BOLSO_RULES") {
        Ok(path) => {
            tracing::info!(%path, "loading classifier rules");
            let content = std::fs::read_to_string(&path)?;
            RuleSet::from_toml(&content)?
        }
        Err(_) => RuleSet::default(),
    };

    let state = AppState {
        db,
        classifier: Arc::new(Classifier::new(rule_set)),
    };

    let host = std::env::var("BOLSO_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("BOLSO_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .unwrap_or(8000);
    let addr = format!("{host}:{port}").parse::<SocketAddr>()?;

    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
