//! Progress accounting for multi-file uploads.

/// Identifier of one batch within a session.
pub type BatchId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A running or finished multi-file upload.
pub struct BatchJob {
    id: BatchId,
    total: usize,
    completed: usize,
    failures: usize,
    finished: bool,
    active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Progress snapshot returned by [`BatchJob::step`].
pub struct BatchProgress {
    /// Items observed so far.
    pub completed: usize,
    /// Items enqueued.
    pub total: usize,
    /// `round(completed / total * 100)`.
    pub percent: u8,
    /// Status line for the progress indicator.
    pub message: String,
    /// `true` on the completion that finished the job, and only on that one.
    pub finished: bool,
}

impl BatchJob {
    /// Starts a job for `total` files. An empty selection starts nothing.
    pub fn start(id: BatchId, total: usize) -> Option<Self> {
        (total > 0).then_some(Self {
            id,
            total,
            completed: 0,
            failures: 0,
            finished: false,
            active: true,
        })
    }

    /// Job id.
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Items enqueued.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Items observed so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Failed items observed so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Whether every item has completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the progress indicator is still shown.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Percentage of completed items, rounded to the nearest integer.
    pub fn percent(&self) -> u8 {
        let ratio = self.completed as f64 / self.total as f64;
        (ratio * 100.0).round() as u8
    }

    /// Status line for the indicator.
    pub fn message(&self) -> String {
        if self.finished {
            "Upload complete".to_string()
        } else if self.total == 1 {
            "Uploading 1 file...".to_string()
        } else {
            format!("Uploading {} files...", self.total)
        }
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            completed: self.completed,
            total: self.total,
            percent: self.percent(),
            message: self.message(),
            finished: self.finished,
        }
    }

    /// Records one item completion, failed or not.
    ///
    /// The counter update and the completion check happen in this single call. Completions
    /// arriving after the job finished are ignored and return `None`.
    pub fn step(&mut self, succeeded: bool) -> Option<BatchProgress> {
        if self.finished {
            return None;
        }
        self.completed += 1;
        if !succeeded {
            self.failures += 1;
        }
        self.finished = self.completed == self.total;
        Some(self.progress())
    }

    /// Hides the indicator of finished job `id`. Returns `false` for another job or an
    /// unfinished one.
    pub fn dismiss(&mut self, id: BatchId) -> bool {
        if id != self.id || !self.finished {
            return false;
        }
        self.active = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_selection_starts_nothing() {
        assert_eq!(BatchJob::start(1, 0), None);
    }

    #[test]
    fn messages_match_batch_size() {
        let single = BatchJob::start(1, 1).expect("job");
        assert_eq!(single.message(), "Uploading 1 file...");
        assert_eq!(single.percent(), 0);
        let many = BatchJob::start(2, 4).expect("job");
        assert_eq!(many.message(), "Uploading 4 files...");
    }

    #[test]
    fn finishes_exactly_once_with_failures_counted() {
        let mut job = BatchJob::start(7, 5).expect("job");
        let outcomes = [true, true, false, true, true];
        let mut finished_signals = 0;
        let mut percents = Vec::new();
        for ok in outcomes {
            let progress = job.step(ok).expect("progress");
            percents.push(progress.percent);
            if progress.finished {
                finished_signals += 1;
                assert_eq!(progress.message, "Upload complete");
            }
        }

        assert_eq!(finished_signals, 1);
        assert_eq!(percents, vec![20, 40, 60, 80, 100]);
        assert_eq!(job.completed(), 5);
        assert_eq!(job.failures(), 1);
        assert_eq!(job.step(true), None);
        assert_eq!(job.completed(), 5);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        let mut job = BatchJob::start(1, 3).expect("job");
        assert_eq!(job.step(true).expect("step").percent, 33);
        assert_eq!(job.step(true).expect("step").percent, 67);
    }

    #[test]
    fn dismissal_only_applies_to_the_finished_job() {
        let mut job = BatchJob::start(3, 1).expect("job");
        assert!(!job.dismiss(3));
        job.step(true);
        assert!(!job.dismiss(4));
        assert!(job.is_active());
        assert!(job.dismiss(3));
        assert!(!job.is_active());
    }
}
