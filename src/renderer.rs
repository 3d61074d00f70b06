//! Label Sheet - Headless Model of the Embedded Renderer
//!
//! Mirrors what the script inside the portable document does, one field
//! per piece of state: the labels built so far, the active search query,
//! the modal's print target and an in-flight single-label print job.
//! Construction is a resumable task advanced one batch at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{self, Row};
use crate::embed::escape_html;
use crate::print::{PrintEnvironment, PrintJob, PrintSignal, PrintStep};

/// Labels built per scheduler tick.
pub const BATCH_SIZE: usize = 50;

/// Caption printed under every code.
pub const CALL_TO_ACTION: &str = "SCAN FOR DOCS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    H,
}

/// How a label's QR code is generated and drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSpec {
    pub payload: String,
    pub error_correction: ErrorCorrection,
    /// 0 picks the smallest version that fits
    pub type_number: u8,
    pub cell_size: u32,
    pub margin: u32,
}

impl CodeSpec {
    pub fn for_url(url: &str) -> Self {
        Self {
            payload: url.to_string(),
            error_correction: ErrorCorrection::M,
            type_number: 0,
            cell_size: 4,
            margin: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelVariant {
    Docs,
    NoDocs,
}

impl LabelVariant {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Docs => "label",
            Self::NoDocs => "label no-docs",
        }
    }
}

/// One constructed label. Owns a copy of its row, so opening it always
/// sees the data it was built from.
#[derive(Debug, Clone)]
pub struct LabelElement {
    row: Row,
    search_key: String,
    id_html: String,
    code: CodeSpec,
    hidden: bool,
}

impl LabelElement {
    pub fn new(row: Row) -> Self {
        Self {
            search_key: row.id.to_lowercase(),
            id_html: escape_html(&row.id),
            code: CodeSpec::for_url(&row.url),
            row,
            hidden: false,
        }
    }

    pub fn row(&self) -> &Row {
        &self.row
    }

    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn id_html(&self) -> &str {
        &self.id_html
    }

    pub fn code(&self) -> &CodeSpec {
        &self.code
    }

    pub fn caption(&self) -> &'static str {
        CALL_TO_ACTION
    }

    pub fn variant(&self) -> LabelVariant {
        if self.row.has_docs() {
            LabelVariant::Docs
        } else {
            LabelVariant::NoDocs
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.search_key.contains(query)
    }
}

/// Batch construction progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub rendered: usize,
    pub total: usize,
}

impl RenderProgress {
    pub fn is_complete(&self) -> bool {
        self.rendered >= self.total
    }
}

impl fmt::Display for RenderProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete() {
            write!(f, "All {} labels ready", self.total)
        } else {
            write!(f, "Rendered {} / {}", self.rendered, self.total)
        }
    }
}

/// Outcome of a search input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStatus {
    pub visible: usize,
    pub total: usize,
    pub query_active: bool,
}

impl SearchStatus {
    /// Text for the filtered-count display; empty without a query.
    pub fn count_text(&self) -> String {
        if self.query_active {
            format!("{} of {}", self.visible, self.total)
        } else {
            String::new()
        }
    }

    /// Whether the "print filtered" button is shown.
    pub fn show_print_filtered(&self) -> bool {
        self.query_active
    }
}

/// Read-only copy of a label shown in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalPreview {
    pub index: usize,
    pub id: String,
    pub variant: LabelVariant,
    pub code: CodeSpec,
}

/// Where a click on the modal overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Overlay,
    ModalBody,
}

#[derive(Debug)]
pub struct LabelSheet {
    rows: Vec<Row>,
    labels: Vec<LabelElement>,
    batch_size: usize,
    query: String,
    modal: Option<ModalPreview>,
    print_job: Option<PrintJob>,
}

impl LabelSheet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self::with_batch_size(rows, BATCH_SIZE)
    }

    pub fn with_batch_size(rows: Vec<Row>, batch_size: usize) -> Self {
        Self {
            rows,
            labels: vec![],
            batch_size: batch_size.max(1),
            query: String::new(),
            modal: None,
            print_job: None,
        }
    }

    /// Parse the embedded data blob.
    pub fn from_blob(blob: &str) -> Self {
        Self::new(data::parse_rows(blob))
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn count_text(&self) -> String {
        format!("{} labels", self.total())
    }

    pub fn labels(&self) -> &[LabelElement] {
        &self.labels
    }

    pub fn progress(&self) -> RenderProgress {
        RenderProgress { rendered: self.labels.len(), total: self.total() }
    }

    /// Build the next batch, in row order. Labels honour the active query,
    /// and stay hidden while a single-label print is pending.
    pub fn render_next_batch(&mut self) -> RenderProgress {
        let start = self.labels.len();
        let end = (start + self.batch_size).min(self.rows.len());
        let printing = self.print_job.is_some();
        for row in &self.rows[start..end] {
            let mut label = LabelElement::new(row.clone());
            label.hidden = printing || !label.matches(&self.query);
            self.labels.push(label);
        }
        let progress = self.progress();
        tracing::trace!(rendered = progress.rendered, total = progress.total, "batch rendered");
        progress
    }

    /// Run construction to completion, collecting every progress update.
    pub fn render_all(&mut self) -> Vec<RenderProgress> {
        let mut updates = vec![self.render_next_batch()];
        while !self.progress().is_complete() {
            updates.push(self.render_next_batch());
        }
        updates
    }

    /// Filter labels by id. During a single-label print only the query is
    /// recorded; it takes effect when the print job restores visibility.
    pub fn search(&mut self, input: &str) -> SearchStatus {
        self.query = input.trim().to_lowercase();
        let printing = self.print_job.is_some();
        let mut visible = 0;
        for label in &mut self.labels {
            let shown = label.matches(&self.query);
            if !printing {
                label.hidden = !shown;
            }
            if shown {
                visible += 1;
            }
        }
        SearchStatus {
            visible,
            total: self.labels.len(),
            query_active: !self.query.is_empty(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.labels.iter().filter(|l| !l.hidden).map(|l| l.id()).collect()
    }

    pub fn hidden_flags(&self) -> Vec<bool> {
        self.labels.iter().map(|l| l.hidden).collect()
    }

    /// Click on a label: it becomes the print target.
    pub fn open_modal(&mut self, index: usize) -> Option<&ModalPreview> {
        let label = self.labels.get(index)?;
        self.modal = Some(ModalPreview {
            index,
            id: label.id().to_string(),
            variant: label.variant(),
            code: label.code().clone(),
        });
        self.modal.as_ref()
    }

    pub fn modal(&self) -> Option<&ModalPreview> {
        self.modal.as_ref()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn on_key(&mut self, key: &str) {
        if key == "Escape" {
            self.close_modal();
        }
    }

    pub fn on_overlay_click(&mut self, target: ClickTarget) {
        if target == ClickTarget::Overlay {
            self.close_modal();
        }
    }

    /// Start printing the modal's target. Returns `false` without a target
    /// or while another print job is pending.
    pub fn print_single(&mut self) -> bool {
        if self.print_job.is_some() {
            return false;
        }
        let Some(target) = self.modal.as_ref().map(|m| m.index) else {
            return false;
        };
        let snapshot = self.hidden_flags();
        for label in &mut self.labels {
            label.hidden = true;
        }
        self.labels[target].hidden = false;
        self.close_modal();
        self.print_job = Some(PrintJob::new(target, snapshot, self.query.clone()));
        true
    }

    pub fn print_job(&self) -> Option<&PrintJob> {
        self.print_job.as_ref()
    }

    /// Feed a timer or environment event to the running print job.
    pub fn advance_print<E: PrintEnvironment>(&mut self, signal: PrintSignal, env: &mut E) -> PrintStep {
        let Some(job) = self.print_job.as_mut() else {
            return PrintStep::Ignore;
        };
        let step = job.advance(signal);
        match step {
            PrintStep::Print => {
                let visible = self.visible_ids();
                env.print(&visible);
            }
            PrintStep::Restore => {
                if let Some(job) = self.print_job.take() {
                    self.restore_after_print(&job);
                }
            }
            PrintStep::Ignore => {}
        }
        step
    }

    /// Labels that existed when the job started get their snapshot back,
    /// unless the query changed meanwhile. Everything else follows the query.
    fn restore_after_print(&mut self, job: &PrintJob) {
        let query_unchanged = job.query() == self.query;
        for (i, label) in self.labels.iter_mut().enumerate() {
            label.hidden = match job.snapshot().get(i) {
                Some(hidden) if query_unchanged => *hidden,
                _ => !label.matches(&self.query),
            };
        }
    }

    /// Print whatever the current filter leaves visible.
    pub fn print_all<E: PrintEnvironment>(&self, env: &mut E) {
        env.print(&self.visible_ids());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> Row {
        Row {
            id: id.to_string(),
            url: format!("https://example.com/{}", id),
            has_ga1: false,
            has_manual: false,
        }
    }

    #[test]
    fn test_batches_in_order() {
        let rows: Vec<_> = (0..120).map(|i| row(&format!("R{}", i))).collect();
        let mut sheet = LabelSheet::new(rows);
        let updates = sheet.render_all();
        let rendered: Vec<_> = updates.iter().map(|p| p.rendered).collect();
        assert_eq!(rendered, vec![50, 100, 120]);
        assert_eq!(updates[2].to_string(), "All 120 labels ready");
        assert_eq!(updates[0].to_string(), "Rendered 50 / 120");
        let ids: Vec<_> = sheet.labels().iter().map(|l| l.id().to_string()).collect();
        assert_eq!(ids[0], "R0");
        assert_eq!(ids[119], "R119");
    }

    #[test]
    fn test_empty_sheet_completes() {
        let mut sheet = LabelSheet::new(vec![]);
        let updates = sheet.render_all();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].to_string(), "All 0 labels ready");
    }

    #[test]
    fn test_label_escapes_id_only() {
        let label = LabelElement::new(Row {
            id: "<B&Q>".to_string(),
            url: "https://x/?a=1&b=2".to_string(),
            has_ga1: false,
            has_manual: true,
        });
        assert_eq!(label.id_html(), "&lt;B&amp;Q&gt;");
        assert_eq!(label.code().payload, "https://x/?a=1&b=2");
        assert_eq!(label.variant(), LabelVariant::Docs);
        assert_eq!(label.search_key(), "<b&q>");
    }

    #[test]
    fn test_late_batches_follow_query() {
        let rows: Vec<_> = (0..4).map(|i| row(&format!("X{}", i))).collect();
        let mut sheet = LabelSheet::with_batch_size(rows, 2);
        sheet.render_next_batch();
        sheet.search("x3");
        sheet.render_next_batch();
        assert_eq!(sheet.visible_ids(), vec!["X3"]);
    }

    #[test]
    fn test_modal_click_inside_keeps_open() {
        let mut sheet = LabelSheet::new(vec![row("A")]);
        sheet.render_all();
        sheet.open_modal(0);
        sheet.on_overlay_click(ClickTarget::ModalBody);
        assert!(sheet.modal().is_some());
        sheet.on_key("Enter");
        assert!(sheet.modal().is_some());
        sheet.on_key("Escape");
        assert!(sheet.modal().is_none());
        assert!(!sheet.print_single());
    }
}
