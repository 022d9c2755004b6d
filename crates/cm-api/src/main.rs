#[tokio::main]
async fn main() {
    if let Err(err) = cm_api::run().await {
        tracing::error!(error = %err, "cm-api exited with an error");
        std::process::exit(1);
    }
}
