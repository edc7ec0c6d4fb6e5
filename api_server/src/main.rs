#[tokio::main]
async fn main() -> std::io::Result<()> {
    api_server::frameworks::server::run_with_config().await
}
