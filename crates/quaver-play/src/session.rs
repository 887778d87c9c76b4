use log::{debug, info};

use crate::chart::Chart;
use crate::error::PlayError;
use crate::judge::{HitWindows, Judge};
use crate::note::LANE_COUNT;
use crate::score::ScoreState;

/// Play phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created but not started; ticks are ignored.
    Idle,
    /// Active play.
    Play,
    /// Stopped; ticks are ignored again.
    Stopped,
}

/// Exclusive owner of one chart and one score state for the lifetime of a
/// play session.
///
/// A driver loop calls [`Session::tick`] once per frame with the current
/// song position, the frame's elapsed time and the lanes pressed this frame;
/// everything else on the session is read access for display.
pub struct Session {
    chart: Chart,
    windows: HitWindows,
    score: ScoreState,
    phase: SessionPhase,
    judge_timing_sec: f64,
}

impl Session {
    /// Create a session over a chart with the given hit windows.
    pub fn new(chart: Chart, windows: HitWindows) -> Self {
        Self {
            chart,
            windows,
            score: ScoreState::new(),
            phase: SessionPhase::Idle,
            judge_timing_sec: 0.0,
        }
    }

    /// Apply a global judge timing adjustment in milliseconds
    /// (negative = early, positive = late).
    pub fn with_judge_timing_ms(mut self, ms: i32) -> Self {
        self.judge_timing_sec = ms as f64 / 1000.0;
        self
    }

    /// Get the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Get the chart (for rendering upcoming/resolved notes).
    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Get the hit windows.
    pub fn windows(&self) -> &HitWindows {
        &self.windows
    }

    /// Get the score state snapshot.
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Whether every note in the chart has been resolved.
    pub fn is_complete(&self) -> bool {
        self.chart.is_complete()
    }

    /// Begin evaluating ticks. Positions sampled before start are never
    /// evaluated.
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Idle {
            info!("session started: {} notes", self.chart.note_count());
            self.phase = SessionPhase::Play;
        }
    }

    /// End the session.
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Play {
            info!(
                "session stopped: score {} combo {} (max {})",
                self.score.score, self.score.combo, self.score.max_combo
            );
            self.phase = SessionPhase::Stopped;
        }
    }

    /// Advance one simulation tick.
    ///
    /// Order: auto-miss sweep, then each pressed lane offered to
    /// [`Session::try_hit`] independently in the order received, then
    /// passive heat decay for the frame's elapsed time, then heat level
    /// re-derivation.
    pub fn tick(
        &mut self,
        song_time_sec: f64,
        elapsed_sec: f64,
        presses: &[usize],
    ) -> Result<(), PlayError> {
        if self.phase != SessionPhase::Play {
            return Ok(());
        }

        let position = self.chart.position_from_song_time(song_time_sec);

        self.auto_miss_sweep(position);
        for &lane in presses {
            self.try_hit(lane, position)?;
        }
        self.score.passive_decay(elapsed_sec);
        self.score.update_heat_level();

        Ok(())
    }

    /// Attempt to hit the earliest unresolved note in `lane` at the given
    /// song position (in the chart's unit). Returns true iff a note was
    /// resolved as a hit.
    ///
    /// A press whose timing error classifies as MISS leaves the note and the
    /// score untouched: pressing far from any note is a no-op, not a
    /// punishable miss.
    pub fn try_hit(&mut self, lane: usize, position: f64) -> Result<bool, PlayError> {
        if lane >= LANE_COUNT {
            return Err(PlayError::InvalidLane {
                lane,
                lane_count: LANE_COUNT,
            });
        }

        let unit_scale = self.chart.unit_scale();
        let windows = self.windows;
        let judge_timing_sec = self.judge_timing_sec;

        // Storage order plus the chart's sort invariant make this the
        // earliest unresolved note in the lane.
        let Some(note) = self
            .chart
            .notes_mut()
            .iter_mut()
            .find(|n| n.lane == lane && !n.is_resolved())
        else {
            return Ok(false);
        };

        let dt_sec = (position - note.position) * unit_scale + judge_timing_sec;
        let judge = windows.classify(dt_sec.abs());
        if judge == Judge::Miss {
            return Ok(false);
        }

        note.hit = true;
        debug!("lane {lane}: {} ({:+.1} ms)", judge.name(), dt_sec * 1000.0);
        self.score.apply_hit(judge, dt_sec);
        Ok(true)
    }

    /// Mark every unresolved note strictly later than the BAD window as
    /// missed. Only lateness is checked; early notes await a future press.
    ///
    /// Each note's miss condition depends only on itself, so the outcome is
    /// independent of traversal order.
    pub fn auto_miss_sweep(&mut self, position: f64) {
        let unit_scale = self.chart.unit_scale();
        let bad = self.windows.bad();

        for note in self.chart.notes_mut() {
            if note.is_resolved() {
                continue;
            }
            if (position - note.position) * unit_scale > bad {
                note.missed = true;
                debug!("lane {}: note at {:.3} aged past BAD window", note.lane, note.position);
                self.score.apply_miss_auto();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PositionUnit;
    use quaver_timing::TimingMap;

    fn seconds_chart(pairs: &[(usize, f64)]) -> Chart {
        Chart::new(TimingMap::default(), PositionUnit::Seconds, pairs).unwrap()
    }

    #[test]
    fn ticks_before_start_are_ignored() {
        let mut session = Session::new(seconds_chart(&[(0, 0.1)]), HitWindows::default());

        // Position 10.0 would auto-miss the note if the session were live.
        session.tick(10.0, 0.016, &[]).unwrap();
        assert!(!session.chart().notes()[0].is_resolved());
        assert_eq!(session.score().miss_count, 0);
    }

    #[test]
    fn stop_freezes_state() {
        let mut session = Session::new(seconds_chart(&[(0, 5.0)]), HitWindows::default());
        session.start();
        session.stop();
        assert_eq!(session.phase(), SessionPhase::Stopped);

        session.tick(10.0, 0.016, &[0]).unwrap();
        assert!(!session.chart().notes()[0].is_resolved());
    }

    #[test]
    fn try_hit_rejects_out_of_range_lane() {
        let mut session = Session::new(seconds_chart(&[]), HitWindows::default());
        assert_eq!(
            session.try_hit(4, 0.0),
            Err(PlayError::InvalidLane {
                lane: 4,
                lane_count: LANE_COUNT
            })
        );
    }

    #[test]
    fn try_hit_targets_earliest_unresolved_note() {
        let mut session = Session::new(seconds_chart(&[(0, 1.0), (0, 1.1)]), HitWindows::default());
        session.start();

        // Press between the two notes; the earlier one must be taken.
        assert!(session.try_hit(0, 1.05).unwrap());
        let notes = session.chart().notes();
        assert!(notes[0].hit);
        assert!(!notes[1].is_resolved());
    }

    #[test]
    fn beat_chart_errors_are_scaled_to_seconds() {
        // 120 BPM: one beat = 0.5 s, so 0.1 beat late = 50 ms = GOOD.
        let timing = TimingMap::new(120.0, 4, 0.0).unwrap();
        let chart = Chart::new(timing, PositionUnit::Beats, &[(0, 4.0)]).unwrap();
        let mut session = Session::new(chart, HitWindows::default());
        session.start();

        assert!(session.try_hit(0, 4.1).unwrap());
        assert_eq!(session.score().last_judge, Judge::Good);
        assert!((session.score().last_dt_ms - 50.0).abs() < 1e-9);
    }

    #[test]
    fn judge_timing_shifts_classification() {
        let mut session = Session::new(seconds_chart(&[(0, 1.0)]), HitWindows::default())
            .with_judge_timing_ms(-30);

        session.start();
        // Raw error +30 ms (GREAT); the -30 ms adjustment recenters to 0.
        assert!(session.try_hit(0, 1.030).unwrap());
        assert_eq!(session.score().last_judge, Judge::Perfect);
    }
}
