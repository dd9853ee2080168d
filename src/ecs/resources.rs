/// Per-frame pursuit parameters, rebuilt before the dispatcher runs.
#[derive(Clone, Copy, Debug)]
pub struct PursuitContext {
    pub player_x: f32,
    /// Fixed per-frame increment (speed / frame rate).
    pub step: f32,
    /// Dead band around the player where a pursuer holds still.
    pub hold_band: f32,
}

impl Default for PursuitContext {
    fn default() -> Self {
        Self {
            player_x: 0.0,
            step: 0.0,
            hold_band: 2.0,
        }
    }
}
