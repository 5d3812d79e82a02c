//! Block-time source for tests and scenario replays.

use auditor_types::Timestamp;
use std::cell::Cell;

/// Host block time under test control. It never moves on its own.
pub struct NullClock {
    block_time: Cell<Timestamp>,
}

impl NullClock {
    pub fn new(start_secs: u64) -> Self {
        Self {
            block_time: Cell::new(Timestamp::new(start_secs)),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.block_time.get()
    }

    /// Move block time forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.block_time.set(self.now().plus_secs(secs));
    }

    /// Jump to `at`. Block time is monotonic, so an earlier instant is ignored.
    pub fn advance_to(&self, at: Timestamp) {
        if at > self.now() {
            self.block_time.set(at);
        }
    }
}
