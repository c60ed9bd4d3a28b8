#[tokio::main]
async fn main() {
    if let Err(e) = warehouse_portal::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
