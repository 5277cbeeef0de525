#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = grievance_portal::run().await {
        eprintln!("grievance-portal fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
