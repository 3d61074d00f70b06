//! Print System - Single-Label Print Jobs
//!
//! Printing one label means hiding every other label for the duration of
//! the print dialog, then putting the sheet back exactly as it was.
//! Browsers give no reliable "dialog closed" callback everywhere, so the
//! job restores on whichever comes first: the `afterprint` event or a
//! fixed fallback delay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delays around the print action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintTiming {
    /// Wait after hiding labels so the change is painted before printing
    pub settle: Duration,
    /// Fallback wait after the print call before restoring visibility
    pub restore: Duration,
}

impl Default for PrintTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            restore: Duration::from_millis(500),
        }
    }
}

/// The viewing environment's print action.
pub trait PrintEnvironment {
    /// Print the sheet; `visible` holds the ids of labels that will appear.
    fn print(&mut self, visible: &[&str]);
}

/// Signals that move a print job forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintSignal {
    /// The settle delay has elapsed
    SettleElapsed,
    /// The environment reported the print dialog closed
    AfterPrint,
    /// The fallback restore delay has elapsed
    RestoreElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintPhase {
    Settling,
    AwaitingRestore,
    Finished,
}

/// What the owner of the label collection should do after a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintStep {
    /// Invoke the print action now
    Print,
    /// Apply the snapshot back to the labels
    Restore,
    /// Signal did not apply to the current phase
    Ignore,
}

/// A single-label print in flight.
#[derive(Debug, Clone)]
pub struct PrintJob {
    target: usize,
    snapshot: Vec<bool>,
    /// Search query active when the job started
    query: String,
    phase: PrintPhase,
}

impl PrintJob {
    /// `snapshot` is every label's hidden flag, taken before anything is hidden.
    pub fn new(target: usize, snapshot: Vec<bool>, query: String) -> Self {
        Self { target, snapshot, query, phase: PrintPhase::Settling }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> PrintPhase {
        self.phase
    }

    pub fn snapshot(&self) -> &[bool] {
        &self.snapshot
    }

    pub fn is_finished(&self) -> bool {
        self.phase == PrintPhase::Finished
    }

    pub fn advance(&mut self, signal: PrintSignal) -> PrintStep {
        match (self.phase, signal) {
            (PrintPhase::Settling, PrintSignal::SettleElapsed) => {
                self.phase = PrintPhase::AwaitingRestore;
                PrintStep::Print
            }
            (PrintPhase::AwaitingRestore, PrintSignal::AfterPrint | PrintSignal::RestoreElapsed) => {
                self.phase = PrintPhase::Finished;
                PrintStep::Restore
            }
            _ => PrintStep::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let t = PrintTiming::default();
        assert_eq!(t.settle.as_millis(), 100);
        assert_eq!(t.restore.as_millis(), 500);
    }

    #[test]
    fn test_job_sequence() {
        let mut job = PrintJob::new(2, vec![false, true, false], String::new());
        assert_eq!(job.advance(PrintSignal::AfterPrint), PrintStep::Ignore);
        assert_eq!(job.advance(PrintSignal::SettleElapsed), PrintStep::Print);
        assert_eq!(job.phase(), PrintPhase::AwaitingRestore);
        assert_eq!(job.advance(PrintSignal::AfterPrint), PrintStep::Restore);
        // Fallback timer firing later is a no-op
        assert_eq!(job.advance(PrintSignal::RestoreElapsed), PrintStep::Ignore);
        assert!(job.is_finished());
    }

    #[test]
    fn test_timer_fallback_restores() {
        let mut job = PrintJob::new(0, vec![false], "ab".to_string());
        job.advance(PrintSignal::SettleElapsed);
        assert_eq!(job.advance(PrintSignal::RestoreElapsed), PrintStep::Restore);
    }
}
