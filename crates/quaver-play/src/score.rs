use crate::judge::Judge;

/// Sentinel recorded in `last_dt_ms` by an auto-miss: the judgment came from
/// a timeout, not a press, so there is no real timing delta.
pub const AUTO_MISS_DT_MS: f64 = 999.0;

const HEAT_MAX: f64 = 100.0;
const HEAT_DECAY_PER_SEC: f64 = 2.0;
const MISS_HEAT_FACTOR: f64 = 0.5;

/// Running score, combo and heat for one session.
///
/// Mutated by every judgment event and every elapsed-time tick; discarded at
/// session end. `score` and `max_combo` are monotonically non-decreasing,
/// `heat` stays in `[0, 100]`.
#[derive(Debug, Clone)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    /// Heat resource, 0..100.
    pub heat: f64,
    /// Heat level 0..3, derived from `heat` by [`ScoreState::update_heat_level`].
    pub heat_level: u8,
    /// Most recent judgment tier.
    pub last_judge: Judge,
    /// Signed timing error of the most recent judgment in milliseconds
    /// (positive = late), or [`AUTO_MISS_DT_MS`] for an auto-miss.
    pub last_dt_ms: f64,
    pub perfect_count: u32,
    pub great_count: u32,
    pub good_count: u32,
    pub bad_count: u32,
    pub miss_count: u32,
}

impl ScoreState {
    /// Create a fresh score state for a new session.
    pub fn new() -> Self {
        Self {
            score: 0,
            combo: 0,
            max_combo: 0,
            heat: 0.0,
            heat_level: 0,
            last_judge: Judge::Miss,
            last_dt_ms: 0.0,
            perfect_count: 0,
            great_count: 0,
            good_count: 0,
            bad_count: 0,
            miss_count: 0,
        }
    }

    /// Apply a judged hit with its signed timing error in seconds.
    ///
    /// The hit path never forwards MISS here; a direct MISS application
    /// still gets combo-break semantics rather than corrupting state.
    pub fn apply_hit(&mut self, judge: Judge, dt_sec: f64) {
        self.last_judge = judge;
        self.last_dt_ms = dt_sec * 1000.0;
        self.tally(judge);

        if !judge.continues_combo() {
            self.combo = 0;
            self.heat *= MISS_HEAT_FACTOR;
            return;
        }

        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.score += judge.score_delta();
        self.heat = (self.heat + judge.heat_delta()).min(HEAT_MAX);
    }

    /// Apply the penalty for a note that aged past the worst window without
    /// being pressed. Heat is halved, not zeroed, so part of the investment
    /// survives.
    pub fn apply_miss_auto(&mut self) {
        self.last_judge = Judge::Miss;
        self.last_dt_ms = AUTO_MISS_DT_MS;
        self.tally(Judge::Miss);
        self.combo = 0;
        self.heat *= MISS_HEAT_FACTOR;
    }

    /// Re-derive `heat_level` from `heat`. Call after any heat-affecting
    /// operation in a tick, before the level is read.
    pub fn update_heat_level(&mut self) {
        self.heat_level = if self.heat < 25.0 {
            0
        } else if self.heat < 50.0 {
            1
        } else if self.heat < 75.0 {
            2
        } else {
            3
        };
    }

    /// Drain heat for elapsed real time, independent of judgments.
    pub fn passive_decay(&mut self, elapsed_sec: f64) {
        self.heat = (self.heat - elapsed_sec * HEAT_DECAY_PER_SEC).max(0.0);
    }

    /// Total number of judged notes.
    pub fn judged_count(&self) -> u32 {
        self.perfect_count + self.great_count + self.good_count + self.bad_count + self.miss_count
    }

    fn tally(&mut self, judge: Judge) {
        match judge {
            Judge::Perfect => self.perfect_count += 1,
            Judge::Great => self.great_count += 1,
            Judge::Good => self.good_count += 1,
            Judge::Bad => self.bad_count += 1,
            Judge::Miss => self.miss_count += 1,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_deltas_by_tier() {
        let mut score = ScoreState::new();
        score.apply_hit(Judge::Perfect, 0.0);
        assert_eq!(score.score, 1000);
        assert!((score.heat - 6.0).abs() < 1e-9);

        score.apply_hit(Judge::Great, 0.010);
        assert_eq!(score.score, 1700);
        assert!((score.heat - 10.0).abs() < 1e-9);

        score.apply_hit(Judge::Good, -0.050);
        assert_eq!(score.score, 2100);

        score.apply_hit(Judge::Bad, 0.100);
        assert_eq!(score.score, 2250);
        assert_eq!(score.combo, 4);
    }

    #[test]
    fn last_judgment_records_signed_ms() {
        let mut score = ScoreState::new();
        score.apply_hit(Judge::Great, -0.030);
        assert_eq!(score.last_judge, Judge::Great);
        assert!((score.last_dt_ms - -30.0).abs() < 1e-9);
    }

    #[test]
    fn auto_miss_breaks_combo_and_halves_heat() {
        let mut score = ScoreState::new();
        for _ in 0..5 {
            score.apply_hit(Judge::Perfect, 0.0);
        }
        assert_eq!(score.combo, 5);
        let heat_before = score.heat;

        score.apply_miss_auto();
        assert_eq!(score.combo, 0);
        assert_eq!(score.max_combo, 5);
        assert_eq!(score.last_judge, Judge::Miss);
        assert!((score.last_dt_ms - AUTO_MISS_DT_MS).abs() < f64::EPSILON);
        assert!((score.heat - heat_before * 0.5).abs() < 1e-9);
    }

    #[test]
    fn misused_miss_hit_behaves_like_combo_break() {
        let mut score = ScoreState::new();
        score.apply_hit(Judge::Perfect, 0.0);
        score.apply_hit(Judge::Miss, 0.200);
        assert_eq!(score.combo, 0);
        assert_eq!(score.score, 1000);
        assert!((score.heat - 3.0).abs() < 1e-9);
    }

    #[test]
    fn heat_clamps_at_100() {
        let mut score = ScoreState::new();
        for _ in 0..50 {
            score.apply_hit(Judge::Perfect, 0.0);
        }
        assert!((score.heat - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn decay_clamps_at_zero() {
        let mut score = ScoreState::new();
        score.heat = 10.0;
        score.passive_decay(5.0);
        assert!((score.heat - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn heat_level_breakpoints() {
        let mut score = ScoreState::new();
        for (heat, level) in [(0.0, 0), (24.9, 0), (25.0, 1), (49.9, 1), (50.0, 2), (74.9, 2), (75.0, 3), (100.0, 3)] {
            score.heat = heat;
            score.update_heat_level();
            assert_eq!(score.heat_level, level, "heat {heat}");
        }
    }
}
