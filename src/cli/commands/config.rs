use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{get_config_dir, load_config, save_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the current configuration")]
    Show,

    #[command(about = "Set the API base URL")]
    SetUrl {
        #[arg(help = "Base URL, e.g. http://127.0.0.1:8000/api/")]
        url: String,
    },

    #[command(about = "Store the bearer token used for requests")]
    SetToken {
        #[arg(help = "JWT access token")]
        token: String,
    },

    #[command(about = "Forget the stored token")]
    Logout,
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = load_config()?;
            let dir = get_config_dir()?;
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "config_dir": dir,
                            "api_base_url": config.base_url(),
                            "authenticated": config.token.is_some(),
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("Config dir: {}", dir.display());
                    println!("API URL:    {}", config.base_url());
                    println!("Token:      {}", if config.token.is_some() { "set" } else { "not set" });
                }
            }
            Ok(())
        }
        ConfigCommands::SetUrl { url } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", url, e))?;
            let mut config = load_config()?;
            config.api_base_url = Some(url.clone());
            save_config(&config)?;
            output_success(&output_format, &format!("API URL set to {}", url), Some(json!({ "api_base_url": url })))
        }
        ConfigCommands::SetToken { token } => {
            let mut config = load_config()?;
            config.token = Some(token);
            save_config(&config)?;
            output_success(&output_format, "Token saved", None)
        }
        ConfigCommands::Logout => {
            let mut config = load_config()?;
            config.token = None;
            save_config(&config)?;

            // The tenant context belongs to the logged-in session
            let store = crate::cli::config::session_store()?;
            crate::client::TenantContext::new(std::sync::Arc::new(store)).clear_tenant();

            output_success(&output_format, "Logged out", None)
        }
    }
}
