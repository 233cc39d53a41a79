use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Cursor = 0,
    Schedule = 1,
    Catch = 2,
    Behavior = 3,
    Movement = 4,
    Decor = 5,
    BuildInstances = 6,
}

const PHASE_COUNT: usize = 7;

impl SystemPhase {
    pub const ALL: [SystemPhase; PHASE_COUNT] = [
        Self::Cursor,
        Self::Schedule,
        Self::Catch,
        Self::Behavior,
        Self::Movement,
        Self::Decor,
        Self::BuildInstances,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Cursor => "Cursor",
            Self::Schedule => "Timers",
            Self::Catch => "Catch",
            Self::Behavior => "Behavior",
            Self::Movement => "Movement",
            Self::Decor => "Decor",
            Self::BuildInstances => "Build Inst.",
        }
    }
}

/// Per-system timing with exponential moving average smoothing.
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; PHASE_COUNT],
    /// Timestamp when `begin()` was called.
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; PHASE_COUNT],
            start: Instant::now(),
        }
    }

    /// Call before a system runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a system finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.record(phase, elapsed_us);
    }

    fn record(&mut self, phase: SystemPhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn get(&self, phase: SystemPhase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// One-line breakdown, slowest phases first.
    pub fn summary(&self) -> String {
        let mut phases = SystemPhase::ALL;
        phases.sort_by(|a, b| self.get(*b).total_cmp(&self.get(*a)));
        phases
            .iter()
            .map(|p| format!("{} {:.1}us", p.label(), self.get(*p)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for SystemTimers {
    fn default() -> Self {
        Self::new()
    }
}
