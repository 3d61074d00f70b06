//! Bundler - Single Entry Point for Building the Portable Sheet
//!
//! Reads the three inputs, encodes them, assembles the template and writes
//! one file. A missing input aborts the build; nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data;
use crate::embed::{escape_template_literal, svg_data_uri};
use crate::hashing::sha256_hex;
use crate::templates::{DocumentTemplate, TemplateError};
use crate::validation::{ValidationResult, Validator, ViolationSeverity};
use crate::ENGINE_VERSION;

pub const LOGO_FILE: &str = "logo.svg";
pub const LIBRARY_FILE: &str = "qrcode.min.js";
pub const DATA_FILE: &str = "qr-codes-all.csv";
pub const OUTPUT_FILE: &str = "qr-print-portable.html";

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Where the bundler reads from and writes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub logo: PathBuf,
    pub library: PathBuf,
    pub data: PathBuf,
    pub output: PathBuf,
    /// Custom template; the built-in label sheet when absent
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl BundleConfig {
    /// The fixed filenames, resolved against `base_dir`.
    pub fn in_dir(base_dir: &Path) -> Self {
        Self {
            logo: base_dir.join(LOGO_FILE),
            library: base_dir.join(LIBRARY_FILE),
            data: base_dir.join(DATA_FILE),
            output: base_dir.join(OUTPUT_FILE),
            template: None,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

/// The assembled document, not yet on disk.
#[derive(Debug, Clone)]
pub struct BundledDocument {
    pub html: String,
    pub rows: usize,
    pub validation: ValidationResult,
}

/// What a build produced, for operator feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub output: PathBuf,
    pub bytes_written: u64,
    /// Size read back from disk after writing
    pub size_on_disk: u64,
    pub sha256: String,
    pub rows: usize,
    pub engine_version: String,
    pub built_at: DateTime<Utc>,
}

impl BuildReport {
    pub fn size_kb(&self) -> f64 {
        self.size_on_disk as f64 / 1024.0
    }

    /// The one status line printed after a build.
    pub fn status_line(&self) -> String {
        let name = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string());
        format!(
            "Done! Created {} ({:.0} KB), fully offline, no network needed",
            name,
            self.size_kb()
        )
    }
}

pub struct Bundler {
    config: BundleConfig,
    template: DocumentTemplate,
    validator: Validator,
}

impl Bundler {
    pub fn new(config: BundleConfig) -> Result<Self, BundleError> {
        let template = match &config.template {
            Some(path) => DocumentTemplate::from_file(path)?,
            None => DocumentTemplate::builtin(),
        };
        Ok(Self::with_template(config, template))
    }

    pub fn with_template(config: BundleConfig, template: DocumentTemplate) -> Self {
        Self {
            config,
            template,
            validator: Validator::new(),
        }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Run the shape checks on the data file alone.
    pub fn check(&self) -> Result<ValidationResult, BundleError> {
        let csv = read_input(&self.config.data)?;
        Ok(self.validator.validate(csv.trim_end()))
    }

    /// Read every input and assemble the document in memory.
    pub fn bundle(&self) -> Result<BundledDocument, BundleError> {
        let logo = read_input(&self.config.logo)?;
        let library = read_input(&self.config.library)?;
        let csv = read_input(&self.config.data)?;
        tracing::debug!(
            logo_bytes = logo.len(),
            library_bytes = library.len(),
            data_bytes = csv.len(),
            "inputs read"
        );

        let csv = csv.trim_end();
        let validation = self.validator.validate(csv);
        for v in &validation.violations {
            match v.severity {
                ViolationSeverity::Error | ViolationSeverity::Warning => {
                    tracing::warn!(rule = %v.rule, line = ?v.line, "{}", v.message)
                }
                ViolationSeverity::Info => {
                    tracing::info!(rule = %v.rule, line = ?v.line, "{}", v.message)
                }
            }
        }

        let html = self.template.assemble(
            &library,
            &svg_data_uri(&logo),
            &escape_template_literal(csv),
        );

        Ok(BundledDocument {
            html,
            rows: data::parse_rows(csv).len(),
            validation,
        })
    }

    /// Bundle and write the document, overwriting any existing output.
    pub fn build(&self) -> Result<BuildReport, BundleError> {
        let document = self.bundle()?;
        let output = &self.config.output;

        fs::write(output, &document.html).map_err(|source| BundleError::Write {
            path: output.clone(),
            source,
        })?;

        // Diagnostic only; the content is already final.
        let size_on_disk = fs::metadata(output)
            .map_err(|source| BundleError::Read { path: output.clone(), source })?
            .len();

        let report = BuildReport {
            output: output.clone(),
            bytes_written: document.html.len() as u64,
            size_on_disk,
            sha256: sha256_hex(document.html.as_bytes()),
            rows: document.rows,
            engine_version: ENGINE_VERSION.to_string(),
            built_at: Utc::now(),
        };
        tracing::info!(
            output = %output.display(),
            bytes = report.size_on_disk,
            rows = report.rows,
            "document written"
        );
        Ok(report)
    }
}

fn read_input(path: &Path) -> Result<String, BundleError> {
    fs::read_to_string(path).map_err(|source| BundleError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_fixed_names() {
        let config = BundleConfig::in_dir(Path::new("/tmp/x"));
        assert_eq!(config.logo, Path::new("/tmp/x/logo.svg"));
        assert_eq!(config.library, Path::new("/tmp/x/qrcode.min.js"));
        assert_eq!(config.data, Path::new("/tmp/x/qr-codes-all.csv"));
        assert_eq!(config.output, Path::new("/tmp/x/qr-print-portable.html"));
        assert!(config.template.is_none());
    }

    #[test]
    fn test_status_line() {
        let report = BuildReport {
            output: PathBuf::from("out/qr-print-portable.html"),
            bytes_written: 2048,
            size_on_disk: 2048,
            sha256: String::new(),
            rows: 1,
            engine_version: ENGINE_VERSION.to_string(),
            built_at: Utc::now(),
        };
        assert_eq!(
            report.status_line(),
            "Done! Created qr-print-portable.html (2 KB), fully offline, no network needed"
        );
    }
}
