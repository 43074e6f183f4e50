use mock_server::Seed;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = match std::env::var("SEED_FILE") {
        Ok(path) => serde_json::from_str::<Seed>(&std::fs::read_to_string(&path)?)?,
        Err(_) => Seed::default(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, posts = seed.blogs.len(), "listening");
    mock_server::run_with(listener, seed.blogs).await?;
    Ok(())
}
