//! Clock and valid/ready handshake wires
//!
//! The clock alternates two half-phases: even halves are combinational
//! (stages evaluate and accept), odd halves are latch (state updates and
//! batch transfers). One clock is shared per run and only the driver
//! advances it.

/// Half-tick clock. `cycle` counts completed comb+latch pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    half: u64,
    cycle: u32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one half-tick. A cycle completes when a latch half ends.
    pub fn tick(&mut self) {
        if self.is_latch() {
            self.cycle += 1;
        }
        self.half += 1;
    }

    pub fn is_comb(&self) -> bool {
        self.half % 2 == 0
    }

    pub fn is_latch(&self) -> bool {
        self.half % 2 == 1
    }

    pub fn half(&self) -> u64 {
        self.half
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }
}

/// One valid/ready wire pair between an adjacent producer/consumer stage
/// pair. The producer writes `valid`, the consumer writes `ready`, each at
/// most once per half-tick; both sides may read both wires.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub valid: bool,
    pub ready: bool,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            valid: false,
            ready: true,
        }
    }
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transfer occurs only when both wires hold
    pub fn fires(&self) -> bool {
        self.valid && self.ready
    }
}
