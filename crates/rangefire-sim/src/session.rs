//! Score, combo, counters, countdown and the match-termination state machine.
//!
//! `Setup -> Running <-> Paused -> GameOver` with `GameOver` terminal. Every
//! mutator is a no-op once the match is over, so late timers and intents
//! cannot change the reported result.

use tracing::info;

use rangefire_core::constants::*;
use rangefire_core::difficulty::DifficultySettings;
use rangefire_core::enums::{GameOverReason, MatchPhase, ScoringPolicy, TargetKind};
use rangefire_core::state::{MatchSummary, ScoreView};

use crate::timers::{TimerKey, Timers};

#[derive(Debug, Clone)]
pub struct MatchSession {
    phase: MatchPhase,
    scoring: ScoringPolicy,
    score: i64,
    combo: u32,
    best_combo: u32,
    total_shots: u32,
    total_hits: u32,
    total_misses: u32,
    max_misses: u32,
    remaining_secs: u32,
    winning_score: i64,
    points_per_kill: i64,
    game_over_reason: Option<GameOverReason>,
    summary: Option<MatchSummary>,
}

impl MatchSession {
    pub fn new(settings: &DifficultySettings, scoring: ScoringPolicy) -> Self {
        Self {
            phase: MatchPhase::Setup,
            scoring,
            score: 0,
            combo: 1,
            best_combo: 1,
            total_shots: 0,
            total_hits: 0,
            total_misses: 0,
            max_misses: settings.max_misses,
            remaining_secs: settings.match_duration_secs,
            winning_score: settings.winning_score,
            points_per_kill: settings.points_per_kill,
            game_over_reason: None,
            summary: None,
        }
    }

    // --- Phase ---

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn summary(&self) -> Option<MatchSummary> {
        self.summary
    }

    /// Setup -> Running; arms the countdown.
    pub fn start(&mut self, timers: &mut Timers) -> bool {
        if self.phase != MatchPhase::Setup {
            return false;
        }
        self.phase = MatchPhase::Running;
        timers.schedule(TimerKey::CountdownSecond, COUNTDOWN_INTERVAL_MS);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != MatchPhase::Running {
            return false;
        }
        self.phase = MatchPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != MatchPhase::Paused {
            return false;
        }
        self.phase = MatchPhase::Running;
        true
    }

    /// Enter `GameOver`. Only the first call has any effect: it cancels every
    /// outstanding timer and freezes the summary.
    pub fn end(&mut self, reason: GameOverReason, timers: &mut Timers) -> Option<MatchSummary> {
        if self.is_over() {
            return None;
        }
        self.phase = MatchPhase::GameOver;
        self.game_over_reason = Some(reason);
        timers.cancel_all();

        let summary = MatchSummary {
            reason,
            score: self.score,
            accuracy_percent: self.accuracy_percent(),
            total_hits: self.total_hits,
            best_combo: self.best_combo,
        };
        self.summary = Some(summary);
        info!(
            ?reason,
            score = summary.score,
            accuracy = summary.accuracy_percent,
            hits = summary.total_hits,
            "match over"
        );
        Some(summary)
    }

    // --- Scoring ---

    pub fn scoring(&self) -> ScoringPolicy {
        self.scoring
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn best_combo(&self) -> u32 {
        self.best_combo
    }

    /// Points for destroying a target of `kind` at the current combo.
    pub fn kill_points(&self, kind: TargetKind) -> i64 {
        match self.scoring {
            ScoringPolicy::Combo => {
                let base = match kind {
                    TargetKind::Heavy => HEAVY_KILL_POINTS,
                    _ => NORMAL_KILL_POINTS,
                };
                base * self.combo as i64
            }
            ScoringPolicy::Flat => self.points_per_kill,
        }
    }

    /// Bonus for shooting a powerup target.
    pub fn powerup_points(&self) -> i64 {
        match self.scoring {
            ScoringPolicy::Combo => POWERUP_BONUS_POINTS * self.combo as i64,
            ScoringPolicy::Flat => POWERUP_BONUS_POINTS,
        }
    }

    /// Adjust the score, clamping at zero. Returns the change actually applied.
    pub fn add_score(&mut self, delta: i64) -> i64 {
        if self.is_over() {
            return 0;
        }
        let before = self.score;
        self.score = (self.score + delta).max(0);
        self.score - before
    }

    pub fn check_win(&self) -> Option<GameOverReason> {
        (!self.is_over() && self.score >= self.winning_score).then_some(GameOverReason::Win)
    }

    /// Count a kill: bump the combo and restart its decay window. Combo is
    /// fixed at 1 under flat scoring.
    pub fn register_kill(&mut self, timers: &mut Timers) -> u32 {
        if self.is_over() || self.scoring == ScoringPolicy::Flat {
            return self.combo;
        }
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
        timers.schedule(TimerKey::ComboDecay, COMBO_DECAY_MS);
        self.combo
    }

    /// Restart the combo decay window without a kill.
    pub fn rearm_combo_decay(&self, timers: &mut Timers) {
        if !self.is_over() && self.scoring == ScoringPolicy::Combo {
            timers.schedule(TimerKey::ComboDecay, COMBO_DECAY_MS);
        }
    }

    /// Decay timer body.
    pub fn reset_combo(&mut self) {
        if !self.is_over() {
            self.combo = 1;
        }
    }

    // --- Counters ---

    pub fn total_shots(&self) -> u32 {
        self.total_shots
    }

    pub fn total_hits(&self) -> u32 {
        self.total_hits
    }

    pub fn total_misses(&self) -> u32 {
        self.total_misses
    }

    pub fn register_shot(&mut self) {
        if !self.is_over() {
            self.total_shots += 1;
        }
    }

    pub fn register_hit(&mut self) {
        if !self.is_over() {
            self.total_hits += 1;
        }
    }

    /// Count a miss. Reports `Misses` once the threshold is reached.
    pub fn register_miss(&mut self) -> Option<GameOverReason> {
        if self.is_over() {
            return None;
        }
        self.total_misses += 1;
        (self.total_misses >= self.max_misses).then_some(GameOverReason::Misses)
    }

    /// Whole percent, 0 when nothing was fired.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_shots == 0 {
            return 0;
        }
        (self.total_hits as f64 / self.total_shots as f64 * 100.0).round() as u32
    }

    // --- Countdown ---

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// One countdown second elapsed. Re-arms itself until time runs out.
    pub fn countdown_tick(&mut self, timers: &mut Timers) -> Option<GameOverReason> {
        if self.is_over() {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(GameOverReason::Time);
        }
        timers.schedule(TimerKey::CountdownSecond, COUNTDOWN_INTERVAL_MS);
        None
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            score: self.score,
            combo: self.combo,
            best_combo: self.best_combo,
            total_shots: self.total_shots,
            total_hits: self.total_hits,
            total_misses: self.total_misses,
            max_misses: self.max_misses,
            remaining_secs: self.remaining_secs,
            winning_score: self.winning_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use rangefire_core::enums::Difficulty;

    use super::*;

    fn running(scoring: ScoringPolicy) -> (MatchSession, Timers) {
        let mut timers = Timers::new();
        let mut s = MatchSession::new(&DifficultySettings::preset(Difficulty::Normal), scoring);
        assert!(s.start(&mut timers));
        (s, timers)
    }

    #[test]
    fn test_score_never_negative() {
        let (mut s, _) = running(ScoringPolicy::Combo);
        assert_eq!(s.add_score(3), 3);
        assert_eq!(s.add_score(-ESCAPE_PENALTY_POINTS), -3);
        assert_eq!(s.score(), 0);
        assert_eq!(s.add_score(-ESCAPE_PENALTY_POINTS), 0);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_combo_scales_kill_points() {
        let (mut s, mut timers) = running(ScoringPolicy::Combo);
        assert_eq!(s.kill_points(TargetKind::Normal), 10);
        s.register_kill(&mut timers);
        s.register_kill(&mut timers);
        assert_eq!(s.combo(), 3);
        assert_eq!(s.kill_points(TargetKind::Heavy), 90);
        assert_eq!(s.powerup_points(), 150);
        assert_eq!(timers.remaining(TimerKey::ComboDecay), Some(COMBO_DECAY_MS));
    }

    #[test]
    fn test_flat_policy_has_no_combo() {
        let (mut s, mut timers) = running(ScoringPolicy::Flat);
        s.register_kill(&mut timers);
        s.rearm_combo_decay(&mut timers);
        assert_eq!(s.combo(), 1);
        assert!(!timers.is_scheduled(TimerKey::ComboDecay));
        assert_eq!(s.kill_points(TargetKind::Heavy), 10);
        assert_eq!(s.powerup_points(), POWERUP_BONUS_POINTS);
    }

    #[test]
    fn test_best_combo_is_high_water_mark() {
        let (mut s, mut timers) = running(ScoringPolicy::Combo);
        for _ in 0..4 {
            s.register_kill(&mut timers);
        }
        s.reset_combo();
        s.register_kill(&mut timers);
        assert_eq!(s.combo(), 2);
        assert_eq!(s.best_combo(), 5);
        assert!(s.best_combo() >= s.combo());
    }

    #[test]
    fn test_end_is_idempotent_and_freezes_state() {
        let (mut s, mut timers) = running(ScoringPolicy::Combo);
        s.add_score(40);
        s.register_shot();
        s.register_hit();
        timers.schedule(TimerKey::PowerupExpiry, 7000.0);

        let summary = s.end(GameOverReason::Misses, &mut timers).unwrap();
        assert_eq!(summary.score, 40);
        assert_eq!(summary.accuracy_percent, 100);
        assert!(timers.is_empty());

        assert_eq!(s.end(GameOverReason::Win, &mut timers), None);
        assert_eq!(s.game_over_reason(), Some(GameOverReason::Misses));
        assert_eq!(s.add_score(100), 0);
        assert_eq!(s.register_miss(), None);
        assert!(!s.resume());
        assert!(!s.pause());
        assert_eq!(s.summary(), Some(summary));
    }

    #[test]
    fn test_accuracy_rounds_and_handles_zero_shots() {
        let (mut s, _) = running(ScoringPolicy::Combo);
        assert_eq!(s.accuracy_percent(), 0);
        for _ in 0..3 {
            s.register_shot();
        }
        s.register_hit();
        assert_eq!(s.accuracy_percent(), 33);
        s.register_hit();
        assert_eq!(s.accuracy_percent(), 67);
    }

    #[test]
    fn test_countdown_reaches_time() {
        let settings = DifficultySettings {
            match_duration_secs: 2,
            ..DifficultySettings::default()
        };
        let mut timers = Timers::new();
        let mut s = MatchSession::new(&settings, ScoringPolicy::Combo);
        s.start(&mut timers);

        assert_eq!(timers.advance(COUNTDOWN_INTERVAL_MS), vec![TimerKey::CountdownSecond]);
        assert_eq!(s.countdown_tick(&mut timers), None);
        assert_eq!(s.remaining_secs(), 1);
        assert_eq!(timers.advance(COUNTDOWN_INTERVAL_MS), vec![TimerKey::CountdownSecond]);
        assert_eq!(s.countdown_tick(&mut timers), Some(GameOverReason::Time));
    }

    #[test]
    fn test_phase_transitions_are_guarded() {
        let mut timers = Timers::new();
        let mut s = MatchSession::new(&DifficultySettings::default(), ScoringPolicy::Combo);
        assert!(!s.pause());
        assert!(s.start(&mut timers));
        assert!(!s.start(&mut timers));
        assert!(s.pause());
        assert!(!s.pause());
        assert!(s.resume());
        assert_eq!(s.phase(), MatchPhase::Running);
    }
}
