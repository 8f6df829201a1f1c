use anyhow::Result;
use clap::{Parser, ValueEnum};
use fridge_chef::app::App;
use fridge_chef::cli::{self, CliAction, CliOptions};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Cli,
    Api,
}

#[derive(Debug, Parser)]
#[command(name = "fridge-chef")]
#[command(about = "Suggest recipes from a photo of your fridge")]
struct CliArgs {
    /// Run once from the command line, or serve the HTTP API.
    #[arg(long, value_enum, default_value_t = Mode::Cli)]
    mode: Mode,

    /// Step to run in cli mode.
    #[arg(long, value_enum, default_value_t = CliAction::Both)]
    action: CliAction,

    /// Image file name inside the input directory.
    #[arg(long)]
    image: Option<String>,

    /// Number of recipes to generate.
    #[arg(long = "recipes", default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    recipe_count: u32,

    /// Address to bind in api mode.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind in api mode.
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fridge_chef=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match args.mode {
        Mode::Api => {
            info!("Starting HTTP API on {}:{}", args.host, args.port);
            if let Err(e) = fridge_chef::api::serve(Arc::new(app), &args.host, args.port).await {
                error!("HTTP server failed: {}", e);
                std::process::exit(1);
            }
        }
        Mode::Cli => {
            let options = CliOptions {
                action: args.action,
                image: args.image,
                recipe_count: args.recipe_count,
            };
            if let Err(e) = cli::run(&app, &options).await {
                error!("Run failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["fridge-chef"]).unwrap();
        assert_eq!(args.mode, Mode::Cli);
        assert_eq!(args.action, CliAction::Both);
        assert_eq!(args.recipe_count, 5);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 8000);
        assert!(args.image.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let args = CliArgs::try_parse_from([
            "fridge-chef",
            "--mode",
            "cli",
            "--action",
            "analyze",
            "--image",
            "fridge.jpg",
            "--recipes",
            "3",
        ])
        .unwrap();
        assert_eq!(args.action, CliAction::Analyze);
        assert_eq!(args.image.as_deref(), Some("fridge.jpg"));
        assert_eq!(args.recipe_count, 3);
    }

    #[test]
    fn test_api_flags() {
        let args =
            CliArgs::try_parse_from(["fridge-chef", "--mode", "api", "--port", "9000"]).unwrap();
        assert_eq!(args.mode, Mode::Api);
        assert_eq!(args.port, 9000);
    }

    #[test]
    fn test_zero_recipes_rejected() {
        assert!(CliArgs::try_parse_from(["fridge-chef", "--recipes", "0"]).is_err());
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(CliArgs::try_parse_from(["fridge-chef", "--action", "cook"]).is_err());
    }
}
