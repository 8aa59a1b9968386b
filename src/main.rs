use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = bitbyte::cli::Cli::parse();
    if let Err(e) = bitbyte::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
