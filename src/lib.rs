//! LabelPack Core - Portable QR Label Sheet Bundler
//!
//! # Ground Rules
//! 1. One Build, One File: the output needs no network and no other files
//! 2. Escaping Is Ordered: backslash, then backtick, then `${`
//! 3. Templates Are Contracts: three markers, each exactly once
//! 4. Deterministic Output: equal inputs give byte-identical documents
//! 5. The Sheet Is a State Machine: batches, search, modal and print jobs

pub mod templates;
pub mod validation;
pub mod hashing;
pub mod print;
pub mod bundle;
pub mod data;
pub mod embed;
pub mod renderer;

pub use templates::{DocumentTemplate, TemplateError};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use hashing::sha256_hex;
pub use print::{PrintEnvironment, PrintJob, PrintSignal, PrintStep, PrintTiming};
pub use bundle::{BuildReport, BundleConfig, BundleError, BundledDocument, Bundler};
pub use data::{parse_rows, Row};
pub use embed::{escape_template_literal, svg_data_uri, unescape_template_literal};
pub use renderer::{LabelElement, LabelSheet, LabelVariant, RenderProgress, SearchStatus, BATCH_SIZE};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
