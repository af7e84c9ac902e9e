//! `schemagen generate`: incremental code generation.
//!
//! For each selected configuration:
//! 1. Assemble the generation request
//! 2. Compare its fingerprint with the configuration's cache record
//! 3. Reuse the recorded outputs, or run the generator and record the new ones
//! 4. Print the classified output paths, one per line

use schemagen_cache::{FileStore, GenerationTask};
use schemagen_config::{GeneratorConfig, ResolvedConfiguration};
use schemagen_request::OutputClassifier;

use crate::external::CommandGenerator;
use crate::pipeline::{
    load_dependency_report, prepare, resolve_project_root, selected_configurations,
};
use crate::{ConfigurationArgs, GlobalArgs};

/// Version of this tool, part of every cache entry's version stamp.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs the `schemagen generate` command.
///
/// Returns exit code 0 when every configuration produced its outputs, 1 when
/// a generator failed.
pub fn run(args: &ConfigurationArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = schemagen_config::load_config(&project_dir)?;

    if !global.quiet {
        eprintln!(
            "  Generating {} v{}",
            config.project.name, config.project.version
        );
    }

    let generator = CommandGenerator::from_config(&config.generator, &project_dir)?;
    let report = load_dependency_report(&config, &project_dir)?;

    for name in selected_configurations(&config, args) {
        let prepared = prepare(&project_dir, &config, report.as_ref(), &name)?;
        let resolved = &prepared.resolved;
        create_output_dirs(resolved)?;

        if global.verbose {
            eprintln!(
                "      Inputs {} file(s), {} dependency artifact(s)",
                prepared.request.inputs.len(),
                prepared.request.dependencies.len()
            );
        }

        let mut task = task_for(resolved, &config.generator);
        let output = match task.run(&prepared.request, &generator) {
            Ok(output) => output,
            Err(e) => {
                eprintln!("error: configuration `{name}`: {e}");
                return Ok(1);
            }
        };

        if !global.quiet {
            let verb = if output.regenerated { "Generated" } else { "Up to date" };
            eprintln!(
                "  {verb:>10} {name} ({}: {} source(s), {} resource(s))",
                output.state,
                output.outputs.sources.len(),
                output.outputs.resources.len()
            );
        }

        if output.outputs.is_empty() {
            tracing::warn!(configuration = %name, "generator produced no outputs");
        }

        for path in output.paths() {
            println!("{}", path.display());
        }
    }

    Ok(0)
}

/// Creates the generation task persisting to the configuration's cache dir.
///
/// Entries are stamped with [`cache_version`], so records written for a
/// different generator read as absent.
pub fn task_for(
    resolved: &ResolvedConfiguration,
    generator: &GeneratorConfig,
) -> GenerationTask<FileStore> {
    GenerationTask::new(
        FileStore::new(&resolved.cache_dir, &cache_version(generator)),
        OutputClassifier::new(resolved.source_extension.as_str()),
    )
}

/// Version stamp of cache entries: the tool version plus the generator
/// command line.
pub fn cache_version(generator: &GeneratorConfig) -> String {
    let command = generator.command.as_deref().unwrap_or_default();
    // JSON keeps argument boundaries unambiguous.
    let args = serde_json::to_string(&generator.args).unwrap_or_default();
    format!("{TOOL_VERSION} {command} {args}")
}

fn create_output_dirs(resolved: &ResolvedConfiguration) -> Result<(), Box<dyn std::error::Error>> {
    for dir in [&resolved.output_dir, &resolved.resource_dir] {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create {}: {e}", dir.display()))?;
    }
    Ok(())
}
