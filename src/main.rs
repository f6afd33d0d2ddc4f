use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use twitch_oauth2_adapter::{AdapterConfig, AdapterError, TwitchAdapter};

#[derive(Debug, Parser)]
#[command(
    name = "twitch-oauth",
    about = "Sign in with Twitch locally and print the normalized profile as JSON."
)]
struct Cli {
    #[arg(long, env = "TWITCH_CLIENT_ID")]
    client_id: String,

    #[arg(long, env = "TWITCH_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Must match a redirect URL registered for the Twitch application.
    #[arg(long, default_value = "http://localhost:3000")]
    redirect_uri: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the consent URL.
    AuthUrl,
    /// Run the full login through a loopback redirect listener.
    Login {
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Print the login-button SVG.
    Icon,
}

#[tokio::main]
async fn main() -> Result<(), AdapterError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config =
        AdapterConfig::new(cli.client_id, cli.client_secret).with_redirect_uri(cli.redirect_uri);
    let adapter = TwitchAdapter::new(config)?;

    match cli.command {
        Command::AuthUrl => println!("{}", adapter.auth_url()),
        Command::Icon => println!("{}", adapter.icon()),
        Command::Login { timeout_secs } => run_login(&adapter, timeout_secs).await?,
    }
    Ok(())
}

async fn run_login(
    adapter: &TwitchAdapter,
    timeout_secs: Option<u64>,
) -> Result<(), AdapterError> {
    let profile = adapter
        .run_local_flow(timeout_secs.map(Duration::from_secs), |auth_url| {
            tracing::info!(
                redirect_uri = %adapter.config().redirect_uri,
                "waiting for twitch redirect"
            );
            eprintln!("Authorization URL:\n{auth_url}");
            if let Err(err) = webbrowser::open(auth_url) {
                eprintln!("Failed to open browser automatically: {err}");
            }
            Ok(())
        })
        .await?;

    let output =
        serde_json::to_string_pretty(&profile).map_err(|err| AdapterError::InvalidResponse {
            message: err.to_string(),
            body: String::new(),
        })?;

    println!("{output}");
    Ok(())
}
