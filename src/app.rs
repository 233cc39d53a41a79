use std::path::PathBuf;

use butterfly_garden::config::GardenConfig;
use butterfly_garden::ecs::components::BehaviorState;
use butterfly_garden::garden::{GardenSimulation, TICK_RATE};
use butterfly_garden::render::instance::SpriteInstance;
use butterfly_garden::targets::{TargetId, WordTargets};
use butterfly_garden::viewport::Viewport;
use glam::Vec2;
use instant::Instant;

/// Page area the headless driver simulates.
const VIEWPORT_SIZE: Vec2 = Vec2::new(1280.0, 800.0);
/// How often to log frame stats (simulated seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;
/// Seconds between scripted swipes across the page.
const SWIPE_PERIOD: f64 = 7.0;
const SWIPE_DURATION: f64 = 0.3;
/// Seconds between scripted clicks that plant a seed.
const PLANT_PERIOD: f64 = 3.0;
/// Words in the mock document that are pushed out of the page mid-run.
const DETACH_EVERY: usize = 7;

const STATES: [BehaviorState; 5] = [
    BehaviorState::Spawning,
    BehaviorState::Flying,
    BehaviorState::Hovering,
    BehaviorState::Scared,
    BehaviorState::Leaving,
];

/// Options for one headless run.
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub seconds: f64,
    pub words: usize,
    pub seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: f64,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: 0.0,
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    /// Record the wall cost of one frame at simulated time `now`.
    fn record_frame(&mut self, cost: f64, now: f64, garden: &GardenSimulation) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += cost;
        self.frame_time_min = self.frame_time_min.min(cost);
        self.frame_time_max = self.frame_time_max.max(cost);

        if now - self.last_log_time >= STATS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            log::info!(
                "t={:.0}s | butterflies: {} | avg: {:.3}ms | min: {:.3}ms | max: {:.3}ms | total frames: {}",
                now,
                garden.population(),
                avg_ms,
                self.frame_time_min * 1000.0,
                self.frame_time_max * 1000.0,
                self.frame_count,
            );
            log::debug!("tick phases: {}", garden.timers().summary());
            self.last_log_time = now;
            self.frame_time_sum = 0.0;
            self.frame_time_min = f64::MAX;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Scripted host
// ---------------------------------------------------------------------------

/// Lay out `count` words in lines of text across the viewport.
fn layout_words(count: usize) -> WordTargets {
    let mut words = WordTargets::new();
    let per_line = 6;
    for i in 0..count {
        let col = (i % per_line) as f32;
        let line = (i / per_line) as f32;
        let pos = Vec2::new(120.0 + col * 180.0, 100.0 + line * 60.0);
        words.add(format!("word-{i}"), pos);
    }
    words
}

/// Pointer path: a slow figure-eight, off the page for a while each cycle,
/// with a fast horizontal swipe every few seconds.
fn scripted_cursor(t: f64, viewport: &Viewport) -> Option<Vec2> {
    let cycle = t % 20.0;
    if (15.0..17.0).contains(&cycle) {
        return None;
    }

    let swipe = t % SWIPE_PERIOD;
    if swipe < SWIPE_DURATION {
        let x = (swipe / SWIPE_DURATION) as f32 * viewport.size.x;
        return Some(viewport.origin + Vec2::new(x, viewport.size.y * 0.5));
    }

    let t = t as f32;
    let center = viewport.center();
    let reach = viewport.size * 0.4;
    Some(center + Vec2::new((t * 0.3).sin() * reach.x, (t * 0.6).sin() * reach.y))
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Entry point: run the garden headless for the requested time.
pub fn run(options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &options.config {
        Some(path) => GardenConfig::load_or_default(path),
        None => GardenConfig::default(),
    };
    if !options.seconds.is_finite() || options.seconds <= 0.0 {
        return Err(format!("--seconds must be positive, got {}", options.seconds).into());
    }

    let viewport = Viewport::new(Vec2::ZERO, VIEWPORT_SIZE);
    let mut garden = GardenSimulation::new(config, viewport, options.seed);
    let mut words = layout_words(options.words);
    let mut stats = FrameStats::new();
    let mut instance_buf: Vec<SpriteInstance> = Vec::with_capacity(1024);

    log::info!(
        "running {:.0}s headless with {} words",
        options.seconds,
        words.len()
    );
    garden.init();

    let mut scrolled = false;
    let mut next_plant = PLANT_PERIOD;
    let mut detached = false;
    let started = Instant::now();

    while garden.now() < options.seconds {
        let frame_start = Instant::now();
        let t = garden.now();

        garden.set_cursor(scripted_cursor(t, garden.viewport()));

        if t >= next_plant {
            let click = garden.viewport().center()
                + Vec2::new(((t * 1.7).sin() * 400.0) as f32, ((t * 0.9).cos() * 250.0) as f32);
            garden.plant_seed(click);
            next_plant += PLANT_PERIOD;
        }

        // Halfway through, some words leave the document and the page scrolls
        if !detached && t >= options.seconds * 0.5 {
            for i in (0..words.len()).step_by(DETACH_EVERY) {
                words.detach(TargetId(i as u32));
            }
            detached = true;
        }
        if !scrolled && t >= options.seconds * 0.6 {
            garden.scroll_to(Vec2::new(0.0, 120.0));
            scrolled = true;
        }

        garden.advance(TICK_RATE, &mut words);
        garden.build_instances(&mut instance_buf);

        stats.record_frame(frame_start.elapsed().as_secs_f64(), garden.now(), &garden);
    }

    let snapshots = garden.snapshots();
    let by_state = STATES
        .iter()
        .map(|&state| {
            let n = snapshots.iter().filter(|s| s.state == state).count();
            format!("{} {n}", state.label())
        })
        .collect::<Vec<_>>()
        .join(", ");
    log::info!(
        "finished in {:.2}s wall: {} butterflies alive ({by_state}), {} spawned, {} words claimed",
        started.elapsed().as_secs_f64(),
        snapshots.len(),
        garden.spawned_total(),
        words.claimed_count(),
    );
    if garden.heatmap().enabled {
        let texture = garden.heatmap().to_texture_data();
        let warm = texture.iter().filter(|&&v| v > 0).count();
        let hottest = texture.iter().copied().max().unwrap_or(0);
        log::info!("heatmap: {warm}/{} warm cells, peak {hottest}", texture.len());
    }

    garden.teardown(&mut words);
    Ok(())
}
