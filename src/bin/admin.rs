use admin_console::cli::utils::output_error;
use admin_console::cli::{Cli, OutputFormat};
use admin_console::ClientError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so ADMIN_API_BASE_URL and friends apply
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = admin_console::cli::run(cli).await {
        let code = e.downcast_ref::<ClientError>().map(ClientError::error_code);
        match (&output_format, std::env::var("CLI_VERBOSE").as_deref()) {
            (OutputFormat::Text, Ok("true") | Ok("1")) => eprintln!("Error: {e:?}"),
            _ => output_error(&output_format, &e.to_string(), code)?,
        }
        std::process::exit(1);
    }

    Ok(())
}
