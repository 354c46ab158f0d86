use pedidos_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    print_banner();

    tracing::info!("Pedidos de Faturamento backend starting...");

    // 2. Load configuration (fails fast when the store credentials are
    // missing, like the original proxy did)
    let config = Config::from_env()?;

    // 3. Initialize server state (store client, Portal client, issuance)
    let state = ServerState::initialize(&config);

    // 4. Run the HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
