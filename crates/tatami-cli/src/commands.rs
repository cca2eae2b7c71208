//! CLI command implementations

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use tatami_core::config::{
    FormatOverrides, HtmlOverrides, IndentationOverrides, ScriptingOverrides, WhitespaceOverrides,
};
use tatami_core::{
    AttributeWrapping, CollapseMode, ConfigLoader, FormatConfig, IndentStyle, NewlineMode, Result,
    ScriptingFormat, TatamiError, TemplateFormatter,
};

use crate::files;
use crate::output::{print_diagnostics, print_summary, FormatSummary};

/// Format command implementation
///
/// Returns the process exit code: 1 when any error diagnostic was raised
/// or `--check` found files needing formatting, 0 otherwise.
pub fn fmt_command(
    paths: &[PathBuf],
    write: bool,
    check: bool,
    config_path: Option<&Path>,
) -> Result<i32> {
    let use_stdin = paths.len() == 1 && paths[0].as_os_str() == "-";
    if use_stdin {
        return format_stdin(config_path);
    }

    let config = load_config(config_path, paths)?;
    let template_files = files::collect_template_files(paths);
    if template_files.is_empty() {
        eprintln!("No template files found to format.");
        return Ok(0);
    }

    debug!("Formatting {} file(s)", template_files.len());

    let mut formatter = TemplateFormatter::new()?;
    let mut summary = FormatSummary::new();

    for file in &template_files {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("error: cannot read {}: {e}", file.display());
                summary.errors += 1;
                continue;
            }
        };

        let result = formatter.format(&source, &config)?;
        summary.files_checked += 1;
        summary.record_diagnostics(&result.diagnostics);
        print_diagnostics(file, &result.diagnostics);

        if result.has_errors() {
            // Never write output produced from a failed analysis.
            continue;
        }

        let changed = result.changed(&source);
        if check {
            if changed {
                summary.needs_format += 1;
                println!("{} needs formatting", file.display());
            }
        } else if write {
            if changed {
                std::fs::write(file, &result.output)
                    .map_err(|e| TatamiError::io_error(file, e))?;
                summary.formatted += 1;
                info!("Formatted {}", file.display());
            } else {
                summary.unchanged += 1;
            }
        } else {
            print!("{}", result.output);
        }
    }

    if check || write {
        print_summary(&summary, check, write);
    }

    let failed = summary.has_errors() || (check && summary.needs_format > 0);
    Ok(if failed { 1 } else { 0 })
}

fn format_stdin(config_path: Option<&Path>) -> Result<i32> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .map_err(|e| TatamiError::io_error("<stdin>", e))?;

    let config = ConfigLoader::load(config_path, None)?.resolve();
    let mut formatter = TemplateFormatter::new()?;
    let result = formatter.format(&source, &config)?;

    print_diagnostics(Path::new("<stdin>"), &result.diagnostics);
    print!("{}", result.output);

    Ok(if result.has_errors() { 1 } else { 0 })
}

/// Load config from the explicit path or auto-discover near the inputs
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> Result<FormatConfig> {
    let start_dir = paths.first().map(|p| {
        if p.is_file() {
            p.parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
        } else {
            p.as_path()
        }
    });

    let overrides = if config_path.is_some() {
        ConfigLoader::load(config_path, start_dir)?
    } else {
        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match ConfigLoader::auto_discover(search_dir) {
            Ok(Some(discovered)) => ConfigLoader::load_from_file(&discovered)?,
            Ok(None) => FormatOverrides::default(),
            Err(e) => {
                // Discovery problems (unreadable start dir) fall back to defaults.
                debug!("config discovery failed: {e}");
                FormatOverrides::default()
            }
        }
    };

    Ok(overrides.resolve())
}

/// Write a fully-populated default config to `tatami.json`
pub fn config_init() -> Result<i32> {
    let path = Path::new("tatami.json");
    if path.exists() {
        eprintln!("tatami.json already exists");
        return Ok(1);
    }

    let defaults = FormatConfig::default();
    let overrides = FormatOverrides {
        indentation: Some(IndentationOverrides {
            size: Some(defaults.indentation.size),
            style: Some(IndentStyle::Space),
            continuation: Some(defaults.indentation.continuation),
        }),
        newline: Some(NewlineMode::Lf),
        whitespace: Some(WhitespaceOverrides {
            trim_trailing: Some(defaults.whitespace.trim_trailing),
            ensure_final_newline: Some(defaults.whitespace.ensure_final_newline),
        }),
        html: Some(HtmlOverrides {
            collapse_whitespace: Some(CollapseMode::Conservative),
            line_width: defaults.html.line_width,
            attribute_wrapping: Some(AttributeWrapping::Preserve),
        }),
        scripting: Some(ScriptingOverrides {
            format: Some(ScriptingFormat::Heuristic),
            line_width: defaults.scripting.line_width,
        }),
    };

    let json = serde_json::to_string_pretty(&overrides)
        .map_err(|e| TatamiError::internal_error(format!("serialize config: {e}")))?;
    std::fs::write(path, format!("{json}\n")).map_err(|e| TatamiError::io_error(path, e))?;

    println!("Wrote tatami.json");
    Ok(0)
}

/// Load the configuration and report whether it is valid
pub fn config_validate(config_path: Option<&Path>) -> Result<i32> {
    match ConfigLoader::load(config_path, None) {
        Ok(overrides) => {
            let resolved = overrides.resolve();
            println!(
                "Configuration is valid (indent {} {}, attribute wrapping {:?})",
                resolved.indentation.size,
                match resolved.indentation.style {
                    IndentStyle::Space => "spaces",
                    IndentStyle::Tab => "tabs",
                },
                resolved.html.attribute_wrapping
            );
            Ok(0)
        }
        Err(e) => {
            eprintln!("Configuration is invalid: {e}");
            Ok(1)
        }
    }
}
