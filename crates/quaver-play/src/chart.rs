use log::info;
use quaver_timing::TimingMap;

use crate::error::PlayError;
use crate::note::{LANE_COUNT, Note, PositionUnit};

/// An ordered collection of notes plus the timing map they are placed on.
///
/// Notes are kept sorted by `(position, lane)` ascending; the sort is
/// re-established on bulk load only, since hit/miss flags never affect
/// ordering. The lane tie-break keeps nearest-note lookup deterministic when
/// two notes share a position.
#[derive(Debug, Clone)]
pub struct Chart {
    timing: TimingMap,
    unit: PositionUnit,
    notes: Vec<Note>,
}

impl Chart {
    /// Build a chart from ordered `(lane, position)` pairs. Lane indices are
    /// validated and the notes are sorted before first use.
    pub fn new(
        timing: TimingMap,
        unit: PositionUnit,
        pairs: &[(usize, f64)],
    ) -> Result<Self, PlayError> {
        for &(lane, _) in pairs {
            if lane >= LANE_COUNT {
                return Err(PlayError::InvalidLane {
                    lane,
                    lane_count: LANE_COUNT,
                });
            }
        }

        let mut notes: Vec<Note> = pairs
            .iter()
            .map(|&(lane, position)| Note::new(lane, position))
            .collect();
        Self::sort_notes(&mut notes);

        info!("chart loaded: {} notes at {} BPM", notes.len(), timing.bpm());

        Ok(Self {
            timing,
            unit,
            notes,
        })
    }

    /// The hardcoded pattern standing in for a real chart format: 64 quarter
    /// notes cycling through the four lanes, starting at bar 2 of a 128 BPM
    /// 4/4 grid.
    pub fn demo() -> Result<Self, PlayError> {
        let timing = TimingMap::new(128.0, 4, 0.0)?;
        let pairs: Vec<(usize, f64)> = (0..64usize).map(|i| (i % 4, 4.0 + i as f64)).collect();
        Self::new(timing, PositionUnit::Beats, &pairs)
    }

    fn sort_notes(notes: &mut [Note]) {
        notes.sort_by(|a, b| {
            a.position
                .total_cmp(&b.position)
                .then(a.lane.cmp(&b.lane))
        });
    }

    /// Get the timing map.
    pub fn timing(&self) -> &TimingMap {
        &self.timing
    }

    /// Get the unit note positions are expressed in.
    pub fn unit(&self) -> PositionUnit {
        self.unit
    }

    /// Get the notes in storage (sorted) order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub(crate) fn notes_mut(&mut self) -> &mut [Note] {
        &mut self.notes
    }

    /// Total number of notes.
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Whether every note has been hit or missed.
    pub fn is_complete(&self) -> bool {
        self.notes.iter().all(Note::is_resolved)
    }

    /// Seconds per unit of note position: 1 for seconds charts,
    /// `seconds_per_beat` for beat charts.
    pub fn unit_scale(&self) -> f64 {
        match self.unit {
            PositionUnit::Seconds => 1.0,
            PositionUnit::Beats => self.timing.seconds_per_beat(),
        }
    }

    /// Convert a song clock sample in seconds into this chart's position
    /// unit.
    pub fn position_from_song_time(&self, song_time_sec: f64) -> f64 {
        match self.unit {
            PositionUnit::Seconds => song_time_sec,
            PositionUnit::Beats => self.timing.beat_from_song_time(song_time_sec),
        }
    }

    /// Convert a note position in this chart's unit back to song seconds.
    pub fn song_time_from_position(&self, position: f64) -> f64 {
        match self.unit {
            PositionUnit::Seconds => position,
            PositionUnit::Beats => self.timing.song_time_from_beat(position),
        }
    }
}
