/// Snapshot of compositing progress: `completed` of `total` images attempted.
///
/// Failed images count as completed, so a finished stage always reports `completed == total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
}

impl ProgressUpdate {
    /// Completion ratio in `[0, 1]`; an empty job counts as done.
    pub fn fraction(self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_done(self) -> bool {
        self.completed >= self.total
    }
}

/// Receives progress updates from the single aggregator thread.
///
/// Updates arrive in increasing `completed` order, one per finished image. Any
/// `FnMut(ProgressUpdate) + Send` closure is an observer.
pub trait ProgressObserver: Send {
    fn on_progress(&mut self, update: ProgressUpdate);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProgressUpdate) + Send,
{
    fn on_progress(&mut self, update: ProgressUpdate) {
        self(update)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/progress.rs"]
mod tests;
