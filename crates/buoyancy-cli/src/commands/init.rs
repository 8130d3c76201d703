use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use buoyancy_lib::project::{project_name_from_path, DEFAULT_PROJECT_NAME};
use buoyancy_lib::{save_project, ProjectConfig, SavedProject};

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Project file to create, conventionally `*.buoy.json`.
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

pub fn handle_init(args: &InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    let name = project_name_from_path(&args.path)
        .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
    let project = SavedProject::new(name, ProjectConfig::default(), Vec::new());
    save_project(&args.path, &project)
        .with_context(|| format!("failed to write {}", args.path.display()))?;

    info!(path = %args.path.display(), name = %project.name, "created project");
    Ok(())
}
