use movelead::{init, relay};
use movelead_config::RelayConfig;

#[tokio::main]
async fn main() {
    init();

    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), relay::StartupError> {
    let config = RelayConfig::from_env()?;
    relay::serve(config).await
}
