//! Scripted input generation for automatic play.
//!
//! Autoplay pre-computes one press event per note, exactly at the note's
//! song time, and replays them deterministically. Used by the headless demo
//! driver and by replay-style tests.

use crate::chart::Chart;

/// Autoplay mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoplayMode {
    /// Autoplay disabled.
    #[default]
    Off,
    /// All lanes are automated.
    Full,
}

impl AutoplayMode {
    /// Check if autoplay is enabled.
    pub fn is_enabled(&self) -> bool {
        *self != AutoplayMode::Off
    }
}

/// A pre-computed press, in song seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressEvent {
    pub time_sec: f64,
    pub lane: usize,
}

/// Build the press schedule for a chart: one press per note at its exact
/// song time, sorted by time with ties broken by lane.
pub fn build_press_events(chart: &Chart) -> Vec<PressEvent> {
    let mut events: Vec<PressEvent> = chart
        .notes()
        .iter()
        .map(|n| PressEvent {
            time_sec: chart.song_time_from_position(n.position),
            lane: n.lane,
        })
        .collect();

    events.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec).then(a.lane.cmp(&b.lane)));
    events
}

/// Replays a press-event schedule against an advancing clock.
pub struct ScriptedInput {
    events: Vec<PressEvent>,
    current_index: usize,
}

impl ScriptedInput {
    /// Create a scripted input source from a pre-built schedule.
    pub fn new(events: Vec<PressEvent>) -> Self {
        Self {
            events,
            current_index: 0,
        }
    }

    /// Return all not-yet-delivered events with `time_sec <= now_sec`, in
    /// schedule order.
    pub fn poll_up_to(&mut self, now_sec: f64) -> &[PressEvent] {
        let start = self.current_index;
        while self.current_index < self.events.len()
            && self.events[self.current_index].time_sec <= now_sec
        {
            self.current_index += 1;
        }
        &self.events[start..self.current_index]
    }

    /// Rewind to the beginning of the schedule.
    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Number of events in the schedule.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
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
    fn schedule_covers_every_note_in_time_order() {
        let chart = seconds_chart(&[(1, 2.0), (0, 1.0), (3, 1.5)]);
        let events = build_press_events(&chart);

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], PressEvent { time_sec: 1.0, lane: 0 });
        assert_eq!(events[1], PressEvent { time_sec: 1.5, lane: 3 });
        assert_eq!(events[2], PressEvent { time_sec: 2.0, lane: 1 });
    }

    #[test]
    fn beat_chart_schedule_uses_song_seconds() {
        let chart = Chart::demo().unwrap();
        let events = build_press_events(&chart);

        // First demo note sits on beat 4 of a 128 BPM grid.
        assert_eq!(events[0].lane, 0);
        assert!((events[0].time_sec - 4.0 * 60.0 / 128.0).abs() < 1e-9);
    }

    #[test]
    fn poll_delivers_each_event_once() {
        let chart = seconds_chart(&[(0, 1.0), (1, 2.0)]);
        let mut input = ScriptedInput::new(build_press_events(&chart));

        assert!(input.poll_up_to(0.5).is_empty());
        assert_eq!(input.poll_up_to(1.0).len(), 1);
        assert!(input.poll_up_to(1.5).is_empty());
        assert_eq!(input.poll_up_to(5.0).len(), 1);
        assert!(input.poll_up_to(10.0).is_empty());
    }

    #[test]
    fn reset_rewinds_the_schedule() {
        let chart = seconds_chart(&[(0, 1.0)]);
        let mut input = ScriptedInput::new(build_press_events(&chart));

        assert_eq!(input.poll_up_to(2.0).len(), 1);
        input.reset();
        assert_eq!(input.poll_up_to(2.0).len(), 1);
    }
}
