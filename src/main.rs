use dotenvy::dotenv;
use stockflow::logging::init_tracing;
use stockflow::router::init_router;
use stockflow::state::init_app_state;
use stockflow_config::ServerConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await?;
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(%address, "Server listening");
    info!("Swagger UI available at http://{}/swagger-ui", address);

    axum::serve(listener, app).await?;

    Ok(())
}
