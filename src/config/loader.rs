//! Loading and saving typed records from an INI file

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use super::ini::{IniDocument, Section};
use super::schema::{RecordInstance, RecordType};
use crate::error::{Error, Result};

/// Loaded instances keyed by record type name
pub type Records = HashMap<String, RecordInstance>;

/// Read and parse the INI file at `path`, failing on any problem
pub fn try_read_document(path: &Path) -> Result<IniDocument> {
    let content = fs::read_to_string(path)?;
    IniDocument::parse(&content)
}

/// Read the INI file at `path`.
///
/// A missing, unreadable or malformed file is not an error: it is reported
/// and an empty document is returned so every record falls back to defaults.
pub fn read_document(path: &Path) -> IniDocument {
    read_or_default(path).0
}

/// Like [`read_document`], also returning why defaults were used, if they were
pub fn read_or_default(path: &Path) -> (IniDocument, Option<String>) {
    match try_read_document(path) {
        Ok(doc) => (doc, None),
        Err(e) => {
            let reason = fallback_reason(&e);
            warn!(path = %path.display(), error = %e, "{}, loading default values", reason);
            (IniDocument::new(), Some(reason))
        }
    }
}

fn fallback_reason(err: &Error) -> String {
    match err {
        Error::Io(e) if e.kind() == ErrorKind::NotFound => "Config file not found".to_string(),
        Error::Io(e) => format!("Error reading config file: {e}"),
        e => format!("Error parsing config file: {e}"),
    }
}

/// Load every registered record type from the file at `path`.
///
/// Missing sections and missing keys fall back to declared defaults.
/// A malformed number aborts the whole load with [`Error::TypeConversion`].
pub fn load(path: &Path, record_types: &[RecordType]) -> Result<Records> {
    let doc = read_document(path);
    load_from_document(&doc, record_types)
}

/// Build instances for `record_types` out of an already parsed document
pub fn load_from_document(doc: &IniDocument, record_types: &[RecordType]) -> Result<Records> {
    let mut records = Records::with_capacity(record_types.len());

    for record_type in record_types {
        let instance = match doc.section(record_type.name()) {
            Some(section) => instance_from_section(record_type, section)?,
            None => {
                info!(
                    section = record_type.name(),
                    "Section not found in config file, loading default values"
                );
                RecordInstance::defaults(record_type)
            }
        };
        records.insert(record_type.name().to_string(), instance);
    }

    Ok(records)
}

fn instance_from_section(record_type: &RecordType, section: &Section) -> Result<RecordInstance> {
    let mut instance = RecordInstance::defaults(record_type);

    for field in record_type.fields() {
        let Some(raw) = section.get(&field.name) else {
            continue;
        };
        let value = field
            .kind()
            .parse(raw)
            .ok_or_else(|| Error::TypeConversion {
                record: record_type.name().to_string(),
                field: field.name.clone(),
                kind: field.kind(),
                value: raw.to_string(),
            })?;
        instance.set(&field.name, value)?;
    }

    for (key, _) in section.entries() {
        if !record_type
            .fields()
            .iter()
            .any(|f| f.name.eq_ignore_ascii_case(key))
        {
            debug!(section = record_type.name(), key, "Ignoring undeclared key");
        }
    }

    Ok(instance)
}

/// Render one section per record type, defaulting any missing instance.
pub fn to_document(record_types: &[RecordType], records: &Records) -> IniDocument {
    let mut doc = IniDocument::new();
    for record_type in record_types {
        doc.set_section(section_for(record_type, records.get(record_type.name())));
    }
    doc
}

fn section_for(record_type: &RecordType, instance: Option<&RecordInstance>) -> Section {
    let defaults;
    let instance = match instance {
        Some(instance) => instance,
        None => {
            defaults = RecordInstance::defaults(record_type);
            &defaults
        }
    };

    let mut section = Section::new(record_type.name());
    for (name, value) in instance.values() {
        section.set(name, value.to_string());
    }
    section
}

/// Save every registered record type to `path`, truncating the file.
pub fn save(path: &Path, record_types: &[RecordType], records: &Records) -> Result<()> {
    write_document(path, &to_document(record_types, records))
}

/// Overwrite `path` with the rendered document
///
/// Fails with [`Error::InvalidName`] before touching the file if a section
/// name or key could not be read back.
pub fn write_document(path: &Path, doc: &IniDocument) -> Result<()> {
    doc.validate()?;
    fs::write(path, doc.to_string())?;
    debug!(path = %path.display(), sections = doc.sections().len(), "Wrote config file");
    Ok(())
}

/// Default content for a fresh inistore config file
pub fn default_config_content() -> String {
    let logging = crate::logging::LoggerConfig::record_type();
    to_document(std::slice::from_ref(&logging), &Records::new()).to_string()
}
