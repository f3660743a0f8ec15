use shelfmark_server::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shelfmark_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    shelfmark_server::run_server(config).await
}
