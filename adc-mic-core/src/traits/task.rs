use std::time::Duration;

/// Task watchdog subscription of the capturing task.
pub trait Watchdog {
    /// Signal liveness and push the deadline out.
    fn reset_deadline(&mut self);
}

/// Cooperative scheduler of the capturing task.
pub trait Scheduler {
    /// Suspend the calling task for `duration` so other tasks can run.
    fn yield_for(&mut self, duration: Duration);
}
