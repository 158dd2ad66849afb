use bridge_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment()?;

    print_banner();

    // 2. Load configuration
    let config = Config::from_env();

    tracing::info!(
        addr = %config.bind_addr,
        port = config.http_port,
        mock = config.mock_printers,
        "Print bridge starting"
    );

    // 3. Build shared state and run
    let state = ServerState::new(config.clone());
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
