//! Aggregated statistics for one batch run.

use serde::Serialize;

/// A document the batch could not turn into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDocument {
    pub document_name: String,
    pub error: String,
}

/// Totals for a finished batch.
///
/// Counters are only advanced by the pipeline while the batch runs; callers
/// receive the finished value and can read it but not change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchRunStats {
    total: usize,
    succeeded: usize,
    failed: usize,
    failures: Vec<FailedDocument>,
    /// Submission index of each entry in `failures`, ascending.
    #[serde(skip)]
    failure_positions: Vec<usize>,
}

impl BatchRunStats {
    /// Start statistics for a batch of `total` documents.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failure for the document submitted at `position`.
    pub(crate) fn record_failure(
        &mut self,
        position: usize,
        document_name: impl Into<String>,
        error: impl Into<String>,
    ) {
        self.failed += 1;
        let at = self.failure_positions.partition_point(|p| *p < position);
        self.failure_positions.insert(at, position);
        self.failures.insert(
            at,
            FailedDocument {
                document_name: document_name.into(),
                error: error.into(),
            },
        );
    }

    /// Documents submitted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Documents accepted.
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Documents rejected.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Documents completed so far.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Rejected documents with their reasons, in submission order.
    pub fn failures(&self) -> &[FailedDocument] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = BatchRunStats::new(3);
        stats.record_success();
        stats.record_failure(1, "b.pdf", "PDF has no pages");
        stats.record_success();

        assert_eq!(stats.total(), 3);
        assert_eq!(stats.succeeded(), 2);
        assert_eq!(stats.failed(), 1);
        assert_eq!(stats.completed(), 3);
        assert_eq!(stats.failures()[0].document_name, "b.pdf");
    }

    #[test]
    fn test_failures_follow_submission_order() {
        let mut stats = BatchRunStats::new(5);
        stats.record_failure(3, "d.pdf", "PDF has no pages");
        stats.record_failure(0, "a.pdf", "PDF is encrypted");
        stats.record_failure(1, "b.pdf", "PDF has no pages");

        let names: Vec<&str> = stats
            .failures()
            .iter()
            .map(|f| f.document_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "d.pdf"]);
    }
}
