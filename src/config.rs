use std::path::Path;

use serde::Deserialize;

/// Errors from reading a garden config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable constants for the garden. Distances in page pixels, speeds in
/// pixels/second, durations in seconds.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    // Population
    pub max_butterflies: usize,
    pub initial_spawn_delay: f32,
    pub spawn_delay_min: f32,
    pub spawn_delay_max: f32,

    // Spawning phase
    pub spawn_margin: f32,
    pub spawn_inset: f32,
    pub spawn_ease: f32,
    pub spawn_arrive: f32,

    // Fear
    pub fear_radius: f32,
    pub scared_hysteresis: f32,
    pub scared_min_duration: f32,
    pub scared_tint_duration: f32,
    pub escape_speed: f32,
    pub panic_jitter: f32,

    // Flight
    pub flying_speed: f32,
    pub hover_speed: f32,
    pub leaving_speed: f32,
    pub damping: f32,
    pub smoothing: f32,
    pub wander_amplitude: f32,
    pub arrive_radius: f32,

    // Hovering
    pub hover_threshold: f32,
    pub hover_duration_min: f32,
    pub hover_duration_max: f32,
    pub hover_wander_radius: f32,
    pub hover_recenter_interval: f32,
    pub words_before_leaving: u32,

    // Leaving
    pub edge_buffer: f32,
    pub exit_margin: f32,
    pub offscreen_margin: f32,

    // Cursor
    pub move_threshold: f32,
    pub catch_speed: f32,
    pub catch_radius: f32,

    // Decorations
    pub heatmap_enabled: bool,
    pub wind_enabled: bool,
    pub flowers_enabled: bool,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            max_butterflies: 10,
            initial_spawn_delay: 0.5,
            spawn_delay_min: 2.0,
            spawn_delay_max: 5.0,

            spawn_margin: 20.0,
            spawn_inset: 100.0,
            spawn_ease: 0.05,
            spawn_arrive: 5.0,

            fear_radius: 100.0,
            scared_hysteresis: 1.15,
            scared_min_duration: 1.0,
            scared_tint_duration: 0.6,
            escape_speed: 240.0,
            panic_jitter: 30.0,

            flying_speed: 120.0,
            hover_speed: 40.0,
            leaving_speed: 200.0,
            damping: 0.98,
            smoothing: 0.08,
            wander_amplitude: 40.0,
            arrive_radius: 100.0,

            hover_threshold: 30.0,
            hover_duration_min: 2.0,
            hover_duration_max: 5.0,
            hover_wander_radius: 20.0,
            hover_recenter_interval: 0.5,
            words_before_leaving: 3,

            edge_buffer: 10.0,
            exit_margin: 50.0,
            offscreen_margin: 40.0,

            move_threshold: 3.0,
            catch_speed: 1500.0,
            catch_radius: 24.0,

            heatmap_enabled: false,
            wind_enabled: true,
            flowers_enabled: true,
        }
    }
}

impl GardenConfig {
    /// Parse a JSON config. Missing fields take their defaults; bad values are
    /// replaced by [`GardenConfig::sanitize`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: GardenConfig = serde_json::from_str(json)?;
        config.sanitize();
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load a config file, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default garden config");
                Self::default()
            }
        }
    }

    /// Replace non-finite or out-of-range values with defaults and put
    /// min/max pairs in order.
    pub fn sanitize(&mut self) {
        let d = Self::default();

        positive(&mut self.initial_spawn_delay, d.initial_spawn_delay, "initial_spawn_delay");
        positive(&mut self.spawn_delay_min, d.spawn_delay_min, "spawn_delay_min");
        positive(&mut self.spawn_delay_max, d.spawn_delay_max, "spawn_delay_max");
        order(&mut self.spawn_delay_min, &mut self.spawn_delay_max);

        non_negative(&mut self.spawn_margin, d.spawn_margin, "spawn_margin");
        non_negative(&mut self.spawn_inset, d.spawn_inset, "spawn_inset");
        unit(&mut self.spawn_ease, d.spawn_ease, "spawn_ease");
        positive(&mut self.spawn_arrive, d.spawn_arrive, "spawn_arrive");

        positive(&mut self.fear_radius, d.fear_radius, "fear_radius");
        if !self.scared_hysteresis.is_finite() || self.scared_hysteresis < 1.0 {
            substitute(&mut self.scared_hysteresis, d.scared_hysteresis, "scared_hysteresis");
        }
        non_negative(&mut self.scared_min_duration, d.scared_min_duration, "scared_min_duration");
        non_negative(&mut self.scared_tint_duration, d.scared_tint_duration, "scared_tint_duration");
        positive(&mut self.escape_speed, d.escape_speed, "escape_speed");
        non_negative(&mut self.panic_jitter, d.panic_jitter, "panic_jitter");

        positive(&mut self.flying_speed, d.flying_speed, "flying_speed");
        positive(&mut self.hover_speed, d.hover_speed, "hover_speed");
        positive(&mut self.leaving_speed, d.leaving_speed, "leaving_speed");
        unit(&mut self.damping, d.damping, "damping");
        unit(&mut self.smoothing, d.smoothing, "smoothing");
        non_negative(&mut self.wander_amplitude, d.wander_amplitude, "wander_amplitude");
        positive(&mut self.arrive_radius, d.arrive_radius, "arrive_radius");

        positive(&mut self.hover_threshold, d.hover_threshold, "hover_threshold");
        non_negative(&mut self.hover_duration_min, d.hover_duration_min, "hover_duration_min");
        non_negative(&mut self.hover_duration_max, d.hover_duration_max, "hover_duration_max");
        order(&mut self.hover_duration_min, &mut self.hover_duration_max);
        non_negative(&mut self.hover_wander_radius, d.hover_wander_radius, "hover_wander_radius");
        positive(&mut self.hover_recenter_interval, d.hover_recenter_interval, "hover_recenter_interval");
        if self.words_before_leaving == 0 {
            log::warn!("config: words_before_leaving must be at least 1, using {}", d.words_before_leaving);
            self.words_before_leaving = d.words_before_leaving;
        }

        positive(&mut self.edge_buffer, d.edge_buffer, "edge_buffer");
        positive(&mut self.exit_margin, d.exit_margin, "exit_margin");
        non_negative(&mut self.offscreen_margin, d.offscreen_margin, "offscreen_margin");

        non_negative(&mut self.move_threshold, d.move_threshold, "move_threshold");
        positive(&mut self.catch_speed, d.catch_speed, "catch_speed");
        non_negative(&mut self.catch_radius, d.catch_radius, "catch_radius");
    }
}

fn substitute(value: &mut f32, default: f32, name: &str) {
    log::warn!("config: {name} = {value} is invalid, using {default}");
    *value = default;
}

fn positive(value: &mut f32, default: f32, name: &str) {
    if !value.is_finite() || *value <= 0.0 {
        substitute(value, default, name);
    }
}

fn non_negative(value: &mut f32, default: f32, name: &str) {
    if !value.is_finite() || *value < 0.0 {
        substitute(value, default, name);
    }
}

/// Factors that must lie in (0, 1].
fn unit(value: &mut f32, default: f32, name: &str) {
    if !value.is_finite() || *value <= 0.0 || *value > 1.0 {
        substitute(value, default, name);
    }
}

fn order(min: &mut f32, max: &mut f32) {
    if *min > *max {
        std::mem::swap(min, max);
    }
}
