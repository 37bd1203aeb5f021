// Lock outcome counters published through the metrics facade.
// Nothing is recorded unless the embedding process installs a recorder.

use metrics::{counter, describe_counter};

pub const ACQUIRE_TOTAL: &str = "cpinit_lock_acquire_total";
pub const RELEASE_TOTAL: &str = "cpinit_lock_release_total";

/// Outcome label values
pub mod outcome {
    pub const ACQUIRED: &str = "acquired";
    pub const HELD: &str = "held";
    pub const LOST_RACE: &str = "lost_race";
    pub const RELEASED: &str = "released";
    pub const ABSENT: &str = "absent";
    pub const ERROR: &str = "error";
}

/// Register metric descriptions. Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(
        ACQUIRE_TOTAL,
        "Control plane init lock acquisition attempts by outcome"
    );
    describe_counter!(
        RELEASE_TOTAL,
        "Control plane init lock release attempts by outcome"
    );
}

pub fn record_acquire(outcome: &'static str) {
    counter!(ACQUIRE_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_release(outcome: &'static str) {
    counter!(RELEASE_TOTAL, "outcome" => outcome).increment(1);
}
