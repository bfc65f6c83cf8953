//! vaultsmith binary entry point.

#[tokio::main]
async fn main() {
    if let Err(err) = vaultsmith::cli::run_cli().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
