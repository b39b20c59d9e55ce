/// Aggregate progress of one multi-subtask operation.
///
/// Each index can be marked complete once; repeated marks are ignored.
/// The owning manager wraps this in a lock, all methods here are plain.
#[derive(Debug, Clone, PartialEq)]
pub struct PasteSingleProcess {
    task_count: usize,
    completed: Vec<bool>,
    success_count: usize,
    progress: f32,
}

impl PasteSingleProcess {
    pub fn new(task_count: usize) -> Self {
        Self {
            task_count,
            completed: vec![false; task_count],
            success_count: 0,
            progress: if task_count == 0 { 1.0 } else { 0.0 },
        }
    }

    /// Marks `index` complete. Returns `false` when it was already marked
    /// or lies outside the task range.
    pub fn success(&mut self, index: usize) -> bool {
        match self.completed.get_mut(index) {
            Some(done) if !*done => {
                *done = true;
                self.success_count += 1;
                self.progress = self.success_count as f32 / self.task_count as f32;
                true
            }
            _ => false,
        }
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn is_done(&self) -> bool {
        self.success_count == self.task_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_success_counts_once() {
        let mut process = PasteSingleProcess::new(4);
        assert!(process.success(0));
        assert!(!process.success(0));

        assert_eq!(process.success_count(), 1);
        assert_eq!(process.progress(), 0.25);
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut process = PasteSingleProcess::new(2);
        assert!(!process.success(2));
        assert_eq!(process.success_count(), 0);
        assert!(!process.is_completed(5));
    }

    #[test]
    fn test_all_done() {
        let mut process = PasteSingleProcess::new(3);
        for i in 0..3 {
            process.success(i);
        }
        assert!(process.is_done());
        assert_eq!(process.progress(), 1.0);
    }

    #[test]
    fn test_zero_tasks_is_complete() {
        let process = PasteSingleProcess::new(0);
        assert!(process.is_done());
        assert_eq!(process.progress(), 1.0);
    }
}
