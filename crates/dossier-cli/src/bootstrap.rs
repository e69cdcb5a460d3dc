use std::path::Path;

use anyhow::Context;
use dossier_config::DossierConfig;

/// Load `.env` from the project root (falling back to the working
/// directory), then the layered configuration rooted at the project.
pub fn load_config(project_root: &Path) -> anyhow::Result<DossierConfig> {
    load_project_dotenv(project_root)?;
    DossierConfig::load_for_project(project_root).context("failed to load dossier configuration")
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}
