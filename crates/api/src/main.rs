#[tokio::main]
async fn main() {
    granite_observability::init();

    let config = granite_api::config::Config::from_env();
    let addr = config.addr.clone();

    let app = granite_api::app::build_app(config).await;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind {addr}: {err}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
