use std::{fs, path::Path};

use serde::Deserialize;

/// Gameplay tunables. Loaded from an optional JSON file so play feel can be
/// adjusted without a rebuild; every field falls back to the built-in value.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub view_width: f32,
    pub view_height: f32,
    pub frame_rate: f32,

    pub gravity: f32,
    pub player_speed: f32,
    pub jump_force: f32,
    pub monster_speed: f32,

    pub platform_spacing: f32,
    pub platform_height: f32,
    pub min_platform_width: f32,
    pub max_platform_width: f32,
    pub side_margin: f32,
    pub lookahead: f32,

    pub monster_chance: f32,
    pub ground_exclusion: f32,
    pub chest_chance: f32,
    pub chest_gap: f32,

    pub start_lives: i32,
    pub height_scale: f32,
    pub win_height: i32,
    pub cull_margin: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            view_width: 800.0,
            view_height: 600.0,
            frame_rate: 60.0,

            gravity: 1600.0,
            player_speed: 600.0,
            jump_force: 700.0,
            monster_speed: 120.0,

            platform_spacing: 120.0,
            platform_height: 24.0,
            min_platform_width: 60.0,
            max_platform_width: 220.0,
            side_margin: 10.0,
            lookahead: 600.0,

            monster_chance: 0.2,
            ground_exclusion: 100.0,
            chest_chance: 0.4,
            chest_gap: 400.0,

            start_lives: 3,
            height_scale: 10.0,
            win_height: 500,
            cull_margin: 800.0,
        }
    }
}

impl Tunables {
    /// Missing or unparseable files fall back to defaults; a climber with
    /// slightly stale tuning beats a crash at startup.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate
    }
}
