//! Single-resource driver
//!
//! Plays the host's part for one `codedeploy_deployment`: loads the declared
//! configuration and persisted state, runs one lifecycle operation, and
//! writes the resulting state back.

use colored::Colorize;
use tracing::info;

use crate::deploy::controller::DeploymentController;
use crate::deploy::waiter::CancelSignal;
use crate::diag::{Diagnostics, Severity};
use crate::errors::ProviderError;
use crate::filesys::file::File;
use crate::models::resource::ResourceConfig;
use crate::storage::state::{load_state, remove_state, save_state};

/// Lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "read" => Ok(Operation::Read),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            _ => Err(format!("Invalid operation: {}", s)),
        }
    }
}

/// Files an operation works on
#[derive(Debug, Clone)]
pub struct ResourceFiles {
    /// Declared configuration, required by create and update
    pub config: Option<File>,

    /// Persisted resource state
    pub state: File,
}

async fn load_config(files: &ResourceFiles) -> Result<ResourceConfig, ProviderError> {
    let config_file = files.config.as_ref().ok_or_else(|| {
        ProviderError::ConfigError("a resource configuration file is required".to_string())
    })?;
    ResourceConfig::parse(&config_file.read_string().await?)
}

/// Run one operation against the resource described by `files`.
///
/// Local I/O problems are returned as errors; everything the lifecycle
/// reports comes back as diagnostics.
pub async fn run(
    operation: Operation,
    controller: &DeploymentController,
    files: &ResourceFiles,
    cancel: CancelSignal,
) -> Result<Diagnostics, ProviderError> {
    info!("Running {} for {}", operation.as_str(), files.state.path().display());

    match operation {
        Operation::Create => {
            if files.state.exists().await {
                return Err(ProviderError::ConfigError(format!(
                    "resource state already exists at {}",
                    files.state.path().display()
                )));
            }
            let config = load_config(files).await?;
            let (state, diags) = controller.create(config, cancel).await;
            if let Some(state) = state {
                save_state(&files.state, &state).await?;
            }
            Ok(diags)
        }
        Operation::Read => {
            let mut state = load_state(&files.state).await?;
            let diags = controller.read(&mut state).await;
            if !diags.has_error() {
                save_state(&files.state, &state).await?;
            }
            Ok(diags)
        }
        Operation::Update => {
            let mut state = load_state(&files.state).await?;
            let config = load_config(files).await?;
            let diags = controller.update(&mut state, config);
            if !diags.has_error() {
                save_state(&files.state, &state).await?;
            }
            Ok(diags)
        }
        Operation::Delete => {
            let state = load_state(&files.state).await?;
            let diags = controller.delete(&state).await;
            remove_state(&files.state).await?;
            Ok(diags)
        }
    }
}

/// Render diagnostics for a terminal
pub fn render_diagnostics(diags: &Diagnostics) -> String {
    let mut out = String::new();
    for diag in diags.iter() {
        let label = match diag.severity {
            Severity::Error => "Error:".red().bold(),
            Severity::Warning => "Warning:".yellow().bold(),
        };
        out.push_str(&format!("{} {}\n", label, diag.summary));
        if let Some(detail) = &diag.detail {
            out.push_str(&format!("  {}\n", detail));
        }
    }
    out
}
