//! CodeDeploy Provider - Entry Point
//!
//! Runs one lifecycle operation of a `codedeploy_deployment` resource:
//!
//! ```text
//! codedeploy-provider --create --config=deployment.json --state=deployment.state.json
//! codedeploy-provider --read   --state=deployment.state.json
//! codedeploy-provider --update --config=deployment.json --state=deployment.state.json
//! codedeploy-provider --delete --state=deployment.state.json
//! codedeploy-provider --schema
//! codedeploy-provider --version
//! ```

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use futures::FutureExt;
use tracing::{error, info};

use codedeploy_provider::app::run::{render_diagnostics, run, Operation, ResourceFiles};
use codedeploy_provider::client::codedeploy::CodeDeployClient;
use codedeploy_provider::deploy::controller::DeploymentController;
use codedeploy_provider::filesys::file::File;
use codedeploy_provider::logs::init_logging;
use codedeploy_provider::schema::provider_schema;
use codedeploy_provider::storage::settings::Settings;
use codedeploy_provider::utils::version_info;

const DEFAULT_SETTINGS_FILE: &str = "codedeploy-provider.json";
const DEFAULT_STATE_FILE: &str = "deployment.state.json";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        return print_json(&version_info());
    }

    if cli_args.contains_key("schema") {
        return print_json(&provider_schema());
    }

    match execute(&cli_args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the operation finished without error diagnostics
async fn execute(cli_args: &HashMap<String, String>) -> anyhow::Result<bool> {
    let operation = select_operation(cli_args)?;

    let settings_file = File::new(
        cli_args
            .get("settings")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SETTINGS_FILE),
    );
    let settings = Settings::load(&settings_file)
        .await
        .with_context(|| format!("unable to read settings {}", settings_file.path().display()))?;
    let options = settings.provider_options()?;

    let _log_guard = init_logging(options.logging.clone())?;
    info!("Running CodeDeploy provider in {}", options.aws.region);

    let client = CodeDeployClient::new(&options.aws).await?;
    let controller = DeploymentController::new(Arc::new(client), options.controller.clone());

    let files = ResourceFiles {
        config: cli_args.get("config").map(File::new),
        state: File::new(
            cli_args
                .get("state")
                .map(String::as_str)
                .unwrap_or(DEFAULT_STATE_FILE),
        ),
    };

    let diags = run(operation, &controller, &files, await_shutdown_signal().boxed()).await?;
    eprint!("{}", render_diagnostics(&diags));
    Ok(!diags.has_error())
}

fn select_operation(cli_args: &HashMap<String, String>) -> anyhow::Result<Operation> {
    let selected: Vec<Operation> = ["create", "read", "update", "delete"]
        .iter()
        .filter(|name| cli_args.contains_key(**name))
        .filter_map(|name| name.parse().ok())
        .collect();

    match selected.as_slice() {
        [operation] => Ok(*operation),
        [] => bail!("one of --create, --read, --update or --delete is required"),
        _ => bail!("only one operation may be given"),
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Unable to install signal handlers, cancellation disabled");
                    return futures::future::pending().await;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, cancelling...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, cancelling...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            return futures::future::pending().await;
        }
        info!("Ctrl+C received, cancelling...");
    }
}
