pub const MAX_LIVES: i32 = 10;
pub const HIT_COOLDOWN_FRAMES: u32 = 60;
pub const NOTICE_FRAMES: u32 = 60;
pub const RESTART_ARM_FRAMES: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// One play session's worth of state: lives, phase, timers, altitude record.
/// Restart builds a fresh value instead of resetting fields one by one.
pub struct GameSession {
    lives: i32,
    phase: Phase,
    cooldown_frames: u32,
    best_altitude: f32,
    chest_pending: bool,
    notice_frames: u32,
    restart_arm_frames: u32,
    height_scale: f32,
    win_height: i32,
}

impl GameSession {
    pub fn new(start_lives: i32, height_scale: f32, win_height: i32) -> Self {
        Self {
            lives: start_lives.clamp(0, MAX_LIVES),
            phase: Phase::Playing,
            cooldown_frames: 0,
            best_altitude: 0.0,
            chest_pending: false,
            notice_frames: 0,
            restart_arm_frames: 0,
            height_scale,
            win_height,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn chest_pending(&self) -> bool {
        self.chest_pending
    }

    pub fn mark_chest_pending(&mut self) {
        self.chest_pending = true;
    }

    pub fn notice_active(&self) -> bool {
        self.notice_frames > 0
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown_frames > 0
    }

    /// Damaging monster touch. Ignored outside Playing or during cooldown;
    /// otherwise costs a life and may end the session.
    pub fn monster_hit(&mut self) -> Option<String> {
        if self.phase != Phase::Playing || self.cooldown_frames > 0 {
            return None;
        }
        self.cooldown_frames = HIT_COOLDOWN_FRAMES;
        self.lives -= 1;
        if self.lives <= 0 {
            self.lives = 0;
            self.enter_terminal(Phase::Lost);
            Some("The climb ends here.".to_string())
        } else {
            Some(format!("Hit! {} lives left.", self.lives))
        }
    }

    /// Chest pickup: one life back (capped), pending flag cleared, transient
    /// notice raised even when already at the cap.
    pub fn bonus_collected(&mut self) -> Option<String> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.lives = (self.lives + 1).min(MAX_LIVES);
        self.chest_pending = false;
        self.notice_frames = NOTICE_FRAMES;
        Some(format!("+1 LIFE ({}/{}).", self.lives, MAX_LIVES))
    }

    /// Dropping below the visible region loses outright, whatever the lives.
    pub fn fall_out(&mut self) -> Option<String> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.enter_terminal(Phase::Lost);
        Some("You fell out of the sky.".to_string())
    }

    /// Records the best ground-relative altitude and checks the win line.
    pub fn record_altitude(&mut self, altitude: f32) -> Option<String> {
        if altitude > self.best_altitude {
            self.best_altitude = altitude;
        }
        if self.phase == Phase::Playing && self.height_display() >= self.win_height {
            self.enter_terminal(Phase::Won);
            return Some("You reached the top!".to_string());
        }
        None
    }

    pub fn height_display(&self) -> i32 {
        (self.best_altitude / self.height_scale).floor() as i32
    }

    /// Frame-counted timers: cooldown, notice, restart arming.
    pub fn tick_timers(&mut self) {
        if self.cooldown_frames > 0 {
            self.cooldown_frames -= 1;
        }
        if self.notice_frames > 0 {
            self.notice_frames -= 1;
        }
        if self.phase.is_terminal() && self.restart_arm_frames > 0 {
            self.restart_arm_frames -= 1;
        }
    }

    /// After the short arm delay, any input edge may trigger a restart.
    pub fn restart_armed(&self) -> bool {
        self.phase.is_terminal() && self.restart_arm_frames == 0
    }

    fn enter_terminal(&mut self, phase: Phase) {
        debug_assert!(phase.is_terminal());
        self.phase = phase;
        self.restart_arm_frames = RESTART_ARM_FRAMES;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(3, 10.0, 500)
    }

    fn clear_cooldown(session: &mut GameSession) {
        for _ in 0..HIT_COOLDOWN_FRAMES {
            session.tick_timers();
        }
    }

    #[test]
    fn three_spaced_hits_lose_the_game() {
        let mut s = session();
        assert!(s.monster_hit().is_some());
        assert_eq!(s.lives(), 2);
        clear_cooldown(&mut s);
        assert!(s.monster_hit().is_some());
        assert_eq!(s.lives(), 1);
        clear_cooldown(&mut s);
        assert!(s.monster_hit().is_some());
        assert_eq!(s.lives(), 0);
        assert_eq!(s.phase(), Phase::Lost);
    }

    #[test]
    fn cooldown_swallows_hits() {
        let mut s = session();
        s.monster_hit();
        assert_eq!(s.lives(), 2);
        assert!(s.monster_hit().is_none());
        assert_eq!(s.lives(), 2);
        // One frame short of a full cooldown still swallows.
        for _ in 0..HIT_COOLDOWN_FRAMES - 1 {
            s.tick_timers();
        }
        assert!(s.monster_hit().is_none());
        s.tick_timers();
        assert!(s.monster_hit().is_some());
    }

    #[test]
    fn bonus_at_cap_keeps_cap_but_clears_pending() {
        let mut s = GameSession::new(MAX_LIVES, 10.0, 500);
        s.mark_chest_pending();
        assert!(s.bonus_collected().is_some());
        assert_eq!(s.lives(), MAX_LIVES);
        assert!(!s.chest_pending());
        assert!(s.notice_active());
    }

    #[test]
    fn notice_expires_after_its_window() {
        let mut s = session();
        s.bonus_collected();
        for _ in 0..NOTICE_FRAMES {
            assert!(s.notice_active());
            s.tick_timers();
        }
        assert!(!s.notice_active());
    }

    #[test]
    fn fall_out_loses_regardless_of_lives() {
        let mut s = session();
        assert!(s.fall_out().is_some());
        assert_eq!(s.phase(), Phase::Lost);
        assert_eq!(s.lives(), 3);
        // Terminal phases are final: nothing mutates them.
        assert!(s.monster_hit().is_none());
        assert!(s.bonus_collected().is_none());
        assert!(s.fall_out().is_none());
    }

    #[test]
    fn altitude_record_is_monotonic() {
        let mut s = session();
        s.record_altitude(150.0);
        assert_eq!(s.height_display(), 15);
        s.record_altitude(90.0);
        assert_eq!(s.height_display(), 15);
        s.record_altitude(155.5);
        assert_eq!(s.height_display(), 15);
        s.record_altitude(160.0);
        assert_eq!(s.height_display(), 16);
    }

    #[test]
    fn reaching_the_win_line_wins_once() {
        let mut s = session();
        assert!(s.record_altitude(5000.0).is_some());
        assert_eq!(s.phase(), Phase::Won);
        assert!(s.record_altitude(6000.0).is_none());
        assert!(s.monster_hit().is_none());
    }

    #[test]
    fn restart_arms_after_short_delay() {
        let mut s = session();
        s.fall_out();
        assert!(!s.restart_armed());
        for _ in 0..RESTART_ARM_FRAMES {
            s.tick_timers();
        }
        assert!(s.restart_armed());
    }

    #[test]
    fn lives_never_leave_bounds() {
        let mut s = session();
        for _ in 0..20 {
            s.bonus_collected();
            assert!(s.lives() <= MAX_LIVES);
        }
        for _ in 0..20 {
            s.monster_hit();
            clear_cooldown(&mut s);
            assert!(s.lives() >= 0);
        }
    }
}
