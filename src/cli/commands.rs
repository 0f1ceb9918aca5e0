//! CLI command implementations

use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;

use crate::cli::{error, info, render_document, success, warn, OutputFormat};
use crate::config::{ini, loader, IniDocument};

/// Write a settings file holding the default [logging] section
pub fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        warn(&format!("{} already exists", config_path.display()));
        return Ok(());
    }

    fs::write(config_path, loader::default_config_content())?;
    tracing::info!(path = %config_path.display(), "Wrote default settings");

    success(&format!("Created {}", config_path.display()));
    info("Edit the [logging] section to change the level or log to a file");

    Ok(())
}

/// List every section of a file
pub fn show(file: &Path, format: OutputFormat) -> Result<()> {
    let doc = read_document(file)?;

    if doc.sections().is_empty() && format == OutputFormat::Table {
        info("No sections found");
        return Ok(());
    }
    println!("{}", render_document(&doc, format)?);

    Ok(())
}

/// Print one value
pub fn get(file: &Path, section: &str, key: &str) -> Result<()> {
    let doc = read_document(file)?;
    let value = lookup(&doc, section, key)?;
    println!("{}", value);
    Ok(())
}

/// Set one value and rewrite the file
///
/// Section names and keys that would not read back as written are refused
/// before the file is touched. Any value is accepted.
pub fn set(file: &Path, section: &str, key: &str, value: &str) -> Result<()> {
    ini::validate_section_name(section)?;
    ini::validate_key(key)?;

    let mut doc = if file.exists() {
        read_document(file)?
    } else {
        IniDocument::new()
    };

    doc.set(section, key, value);
    loader::write_document(file, &doc)?;
    tracing::info!(path = %file.display(), section, key, "Updated value");

    success(&format!("[{}] {} = {}", section, key, value));
    Ok(())
}

/// Parse a file and report the first problem
pub fn check(file: &Path) -> Result<()> {
    match read_document(file) {
        Ok(doc) => {
            let keys: usize = doc.sections().iter().map(|s| s.len()).sum();
            success(&format!(
                "{} is valid ({} sections, {} keys)",
                file.display(),
                doc.sections().len(),
                keys
            ));
            Ok(())
        }
        Err(e) => {
            error(&format!("{}: {}", file.display(), e));
            Err(e)
        }
    }
}

/// Read and parse a file, failing on any error
pub fn read_document(file: &Path) -> Result<IniDocument> {
    let content = fs::read_to_string(file)
        .map_err(|e| anyhow!("Cannot read {}: {}", file.display(), e))?;
    Ok(IniDocument::parse(&content)?)
}

/// Look up a value, naming the missing section or key on failure
pub fn lookup<'a>(doc: &'a IniDocument, section: &str, key: &str) -> Result<&'a str> {
    let s = doc
        .section(section)
        .ok_or_else(|| anyhow!("Section [{}] not found", section))?;
    s.get(key)
        .ok_or_else(|| anyhow!("Key '{}' not found in [{}]", key, section))
}
