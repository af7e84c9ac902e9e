//! `schemagen status`: reports whether each configuration is up to date.
//!
//! Prints one `<configuration>: <state>` line per configuration without
//! running the generator or touching the cache. A configuration whose
//! fingerprint matches but which has no recorded outputs is reported as
//! `unchanged (no recorded outputs)` and counts as needing regeneration,
//! matching what `generate` would do.

use schemagen_cache::CacheState;

use crate::generate::task_for;
use crate::pipeline::{
    load_dependency_report, prepare, resolve_project_root, selected_configurations,
};
use crate::{ConfigurationArgs, GlobalArgs};

/// Runs the `schemagen status` command.
///
/// Returns exit code 0 when no configuration needs regeneration, 1 otherwise.
pub fn run(args: &ConfigurationArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = schemagen_config::load_config(&project_dir)?;
    let report = load_dependency_report(&config, &project_dir)?;

    let mut stale = 0;
    for name in selected_configurations(&config, args) {
        let prepared = prepare(&project_dir, &config, report.as_ref(), &name)?;
        let task = task_for(&prepared.resolved, &config.generator);
        let state = task.state(&prepared.request);
        let needs_generation = task.needs_generation(&prepared.request);
        if needs_generation {
            stale += 1;
        }
        let note = if needs_generation && state == CacheState::Unchanged {
            " (no recorded outputs)"
        } else {
            ""
        };
        println!("{name}: {state}{note}");
    }

    if stale > 0 && !global.quiet {
        eprintln!("  {stale} configuration(s) need regeneration");
    }
    Ok(if stale == 0 { 0 } else { 1 })
}
