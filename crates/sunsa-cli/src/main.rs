//! sunsa CLI
//!
//! Command-line interface for controlling Sunsa smart blinds

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::Result;
use eyre::{OptionExt, eyre};
use sunsa_api::{Device, DeviceId, Position};
use sunsa_client::SunsaClient;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "sunsa")]
#[command(about = "Control Sunsa smart blinds", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sunsa user id
    #[arg(long, env = "SUNSA_USER_ID", global = true)]
    user_id: Option<u64>,

    /// Public API key
    #[arg(long, env = "SUNSA_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all devices
    #[command(name = "devices")]
    Devices {
        /// Print the raw device records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single device
    #[command(name = "device")]
    Device {
        /// Device id
        #[arg(value_parser = DeviceId::from_str)]
        id: DeviceId,
        /// Print the raw device record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a blind (0 is open, -100 and 100 are closed)
    #[command(name = "set-position")]
    SetPosition {
        /// Device id
        #[arg(value_parser = DeviceId::from_str)]
        id: DeviceId,
        /// Target position, a multiple of 10 from -100 to 100
        #[arg(allow_negative_numbers = true)]
        position: i32,
    },
}

fn init_tracing(level: &str, verbose: u8) {
    let level = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_device(device: &Device) -> String {
    let id = device
        .id()
        .map_or_else(|| "?".to_string(), |id| id.to_string());
    let position = device
        .position()
        .map_or_else(|| "-".to_string(), |p| p.to_string());
    format!(
        "{}\t{}\t{}",
        id,
        position,
        device.name().unwrap_or_default()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::locate);
    let config = config_path
        .as_deref()
        .map(Config::load)
        .transpose()?
        .unwrap_or_default();

    init_tracing(&config.log.level, cli.verbose);

    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loaded configuration"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    let user_id = cli
        .user_id
        .or(config.account.user_id)
        .ok_or_eyre("missing user id: pass --user-id, set SUNSA_USER_ID or add it to the config file")?;
    let api_key = cli
        .api_key
        .or(config.account.api_key)
        .ok_or_eyre("missing API key: pass --api-key, set SUNSA_API_KEY or add it to the config file")?;

    let client = SunsaClient::with_base_url(
        &config.api.base_url,
        reqwest::Client::new(),
        user_id,
        api_key,
    )?;

    match cli.command {
        Commands::Devices { json } => {
            let devices = client.list_devices().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else {
                for device in &devices {
                    println!("{}", format_device(device));
                }
            }
        }
        Commands::Device { id, json } => {
            let device = client
                .get_device_info(id.clone())
                .await?
                .ok_or_else(|| eyre!("device {id} not found"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&device)?);
            } else {
                println!("{}", format_device(&device));
            }
        }
        Commands::SetPosition { id, position } => {
            let position = Position::from(position);
            if !position.is_nominal() {
                tracing::warn!(%position, "position is outside the documented range, sending anyway");
            }
            client.update_device_position(id.clone(), position).await?;
            tracing::info!(device = %id, %position, "position updated");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_position() {
        let cli = Cli::try_parse_from(["sunsa", "set-position", "5", "-30"]).unwrap();
        match cli.command {
            Commands::SetPosition { id, position } => {
                assert_eq!(id, DeviceId::Number(5));
                assert_eq!(position, -30);
            }
            _ => panic!("expected set-position"),
        }
    }

    #[test]
    fn test_parse_text_device_id() {
        let cli = Cli::try_parse_from(["sunsa", "device", "kitchen", "--json"]).unwrap();
        match cli.command {
            Commands::Device { id, json } => {
                assert_eq!(id, DeviceId::from("kitchen"));
                assert!(json);
            }
            _ => panic!("expected device"),
        }
    }

    #[test]
    fn test_parsed_id_matches_numeric_record() {
        let cli = Cli::try_parse_from(["sunsa", "device", "2"]).unwrap();
        let Commands::Device { id, json } = cli.command else {
            panic!("expected device");
        };
        assert_eq!(id, DeviceId::Number(2));
        assert!(!json);

        let devices: Vec<Device> = serde_json::from_value(json!([
            { "idDevice": 1, "position": 0 },
            { "idDevice": 2, "position": -50 }
        ]))
        .unwrap();
        let found = devices.into_iter().find(|device| device.has_id(&id));
        assert_eq!(found.and_then(|d| d.position()), Some(Position(-50)));
    }

    #[test]
    fn test_format_device() {
        let device: Device = serde_json::from_value(json!({
            "idDevice": 2,
            "position": -50,
            "name": "Bedroom"
        }))
        .unwrap();
        assert_eq!(format_device(&device), "2\t-50\tBedroom");
    }

    #[test]
    fn test_format_device_without_position() {
        let device: Device = serde_json::from_value(json!({ "idDevice": 3 })).unwrap();
        assert_eq!(format_device(&device), "3\t-\t");
    }

    #[test]
    fn test_format_device_with_odd_fields() {
        let device: Device =
            serde_json::from_value(json!({ "idDevice": null, "position": 45.5 })).unwrap();
        assert_eq!(format_device(&device), "?\t-\t");
    }
}
