//! Template System - The Document Contract
//!
//! A document template is HTML with three markers, each appearing exactly
//! once and in this order:
//!
//! - `%%QR_LIB%%` inside a `<script>` element, replaced by the QR library source
//! - `%%LOGO_SRC%%` inside a double-quoted JS string, replaced by the logo data URI
//! - `%%CSV_DATA%%` inside a backtick template literal, replaced by the escaped rows
//!
//! The template is split at the markers once; assembly is plain
//! concatenation, so inserted text is never scanned for markers.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const LIBRARY_MARKER: &str = "%%QR_LIB%%";
pub const LOGO_MARKER: &str = "%%LOGO_SRC%%";
pub const DATA_MARKER: &str = "%%CSV_DATA%%";

const BUILTIN_TEMPLATE: &str = include_str!("assets/label_sheet.html");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template marker {0} missing or out of order")]
    MissingMarker(&'static str),

    #[error("Template marker {0} appears more than once")]
    DuplicateMarker(&'static str),

    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A template split at its markers.
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    before_library: String,
    before_logo: String,
    before_data: String,
    after_data: String,
}

impl DocumentTemplate {
    /// The label sheet shipped with the crate.
    ///
    /// Cannot fail: the asset is compiled in and its markers are checked
    /// by this module's tests.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_TEMPLATE).expect("built-in template carries all markers")
    }

    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        for marker in [LIBRARY_MARKER, LOGO_MARKER, DATA_MARKER] {
            if text.matches(marker).count() > 1 {
                return Err(TemplateError::DuplicateMarker(marker));
            }
        }

        let (before_library, rest) = text
            .split_once(LIBRARY_MARKER)
            .ok_or(TemplateError::MissingMarker(LIBRARY_MARKER))?;
        let (before_logo, rest) = rest
            .split_once(LOGO_MARKER)
            .ok_or(TemplateError::MissingMarker(LOGO_MARKER))?;
        let (before_data, after_data) = rest
            .split_once(DATA_MARKER)
            .ok_or(TemplateError::MissingMarker(DATA_MARKER))?;

        Ok(Self {
            before_library: before_library.to_string(),
            before_logo: before_logo.to_string(),
            before_data: before_data.to_string(),
            after_data: after_data.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Join the template with already-encoded blobs.
    pub fn assemble(&self, library: &str, logo_uri: &str, data: &str) -> String {
        let mut out = String::with_capacity(
            self.before_library.len()
                + library.len()
                + self.before_logo.len()
                + logo_uri.len()
                + self.before_data.len()
                + data.len()
                + self.after_data.len(),
        );
        out.push_str(&self.before_library);
        out.push_str(library);
        out.push_str(&self.before_logo);
        out.push_str(logo_uri);
        out.push_str(&self.before_data);
        out.push_str(data);
        out.push_str(&self.after_data);
        out
    }
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::PrintTiming;
    use crate::renderer::{BATCH_SIZE, CALL_TO_ACTION};

    #[test]
    fn test_builtin_quoting_around_markers() {
        let t = DocumentTemplate::builtin();
        assert!(t.before_library.ends_with("<script>"));
        assert!(t.before_logo.ends_with("var LOGO_SRC = \""));
        assert!(t.before_data.ends_with("var CSV_DATA = `"));
        assert!(t.after_data.starts_with('`'));
    }

    #[test]
    fn test_builtin_script_matches_renderer_constants() {
        let timing = PrintTiming::default();
        assert!(BUILTIN_TEMPLATE.contains(&format!("var BATCH_SIZE = {};", BATCH_SIZE)));
        assert!(BUILTIN_TEMPLATE.contains(&format!("var SETTLE_MS = {};", timing.settle.as_millis())));
        assert!(BUILTIN_TEMPLATE.contains(&format!("var RESTORE_MS = {};", timing.restore.as_millis())));
        assert!(BUILTIN_TEMPLATE.contains(CALL_TO_ACTION));
        assert!(BUILTIN_TEMPLATE.contains("qrcode(0, 'M')"));
        assert!(BUILTIN_TEMPLATE.contains("createImgTag(4, 0)"));
    }

    #[test]
    fn test_assemble_does_not_rescan_inserts() {
        let t = DocumentTemplate::parse("A%%QR_LIB%%B%%LOGO_SRC%%C%%CSV_DATA%%D").unwrap();
        let out = t.assemble("lib", "uri", "row,%%QR_LIB%%");
        assert_eq!(out, "AlibBuriCrow,%%QR_LIB%%D");
    }

    #[test]
    fn test_missing_and_duplicate_markers() {
        assert!(matches!(
            DocumentTemplate::parse("%%QR_LIB%% %%CSV_DATA%%"),
            Err(TemplateError::MissingMarker(LOGO_MARKER))
        ));
        assert!(matches!(
            DocumentTemplate::parse("%%CSV_DATA%% %%LOGO_SRC%% %%QR_LIB%%"),
            Err(TemplateError::MissingMarker(_))
        ));
        assert!(matches!(
            DocumentTemplate::parse("%%QR_LIB%%%%QR_LIB%%%%LOGO_SRC%%%%CSV_DATA%%"),
            Err(TemplateError::DuplicateMarker(LIBRARY_MARKER))
        ));
    }
}
