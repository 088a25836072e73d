use log::{debug, info, warn};

use ewpnames::{configuration::Configuration, Generation};

const LIST_LIMIT: usize = 5;
const SYSTEM_INCLUDE_LIMIT: usize = 3;

pub fn print(config: &Configuration, generation: &Generation) {
    let report = &generation.report;

    info!(
        "Found {} source files ({} file entries)",
        report.source_count, report.file_count
    );

    if report.system_includes.is_empty() {
        warn!("No toolchain system include paths found, code completion may be incomplete");
    } else {
        info!("Found {} system include paths", report.system_includes.len());
        list(info_line, &report.system_includes, SYSTEM_INCLUDE_LIMIT);
    }

    if let Some(dialect) = &report.dialect {
        debug!("Language dialect option: {}", dialect);
    }
    for preinclude in report.preinclude.iter().filter(|value| !value.is_empty()) {
        debug!("Pre-include: {}", preinclude);
    }

    info!("Wrote {} compile commands to {}", generation.entries.len(), config.output);
    info!("  {} include paths", report.include_count);
    info!("  {} defines", report.define_count);
    info!("  {} system include paths", report.system_includes.len());

    if !report.missing_includes.is_empty() {
        warn!("Include paths not found on disk (still written to the commands):");
        list(warn_line, &report.missing_includes, LIST_LIMIT);
    }

    if !report.missing_sources.is_empty() {
        warn!("Source files not found on disk (left out of the database):");
        list(warn_line, &report.missing_sources, LIST_LIMIT);
    }

    if !report.unresolved_macros.is_empty() {
        warn!("Unresolved IAR macros, set the matching environment variables:");
        for name in &report.unresolved_macros {
            warn!("  - {}", name);
        }
    }

    info!("Restart the clangd language server to pick up the new database.");
}

fn info_line(line: &str) {
    info!("{}", line);
}

fn warn_line(line: &str) {
    warn!("{}", line);
}

fn list<F>(mut emit: F, items: &[String], limit: usize)
where
    F: FnMut(&str),
{
    for item in items.iter().take(limit) {
        emit(&format!("  - {}", item));
    }
    if items.len() > limit {
        emit(&format!("  ... and {} more", items.len() - limit));
    }
}
