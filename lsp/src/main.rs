#[tokio::main]
async fn main() {
    nir_lsp::server::run().await;
}
