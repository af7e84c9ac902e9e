//! `schemagen clean`: removes cache records and generated files.

use std::path::Path;

use schemagen_cache::FileStore;

use crate::generate::TOOL_VERSION;
use crate::pipeline::{resolve_project_root, selected_configurations};
use crate::{ConfigurationArgs, GlobalArgs};

/// Runs the `schemagen clean` command.
///
/// Deletes each selected configuration's cache entries and its output and
/// resource directories. The next `generate` starts with no prior record.
pub fn run(args: &ConfigurationArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = schemagen_config::load_config(&project_dir)?;

    for name in selected_configurations(&config, args) {
        let resolved = schemagen_config::resolve_configuration(&config, &project_dir, &name)?;

        let removed = FileStore::new(&resolved.cache_dir, TOOL_VERSION).clear()?;
        remove_dir(&resolved.output_dir)?;
        remove_dir(&resolved.resource_dir)?;

        tracing::debug!(configuration = %name, entries = removed, "cleaned");
        if !global.quiet {
            eprintln!("    Cleaned {name} ({removed} cache entries)");
        }
    }

    Ok(0)
}

fn remove_dir(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .map_err(|e| format!("cannot remove {}: {e}", dir.display()))?;
    }
    Ok(())
}
