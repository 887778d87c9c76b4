//! Beat/bar timing coordinates for charts.
//!
//! A [`TimingMap`] converts between absolute song time (seconds) and the
//! musical beat/bar grid of a chart. It is built once at chart load and is
//! immutable afterwards.

use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimingError {
    #[error("BPM must be positive and finite, got {bpm}")]
    InvalidBpm { bpm: f64 },

    #[error("beats per bar must be at least 1")]
    InvalidBeatsPerBar,
}

/// Maps between song time in seconds and beat/bar positions.
///
/// `seconds_per_beat` is constant for the map's lifetime; charts with BPM
/// changes are out of scope for this core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingMap {
    bpm: f64,
    beats_per_bar: u32,
    offset_sec: f64,
}

impl TimingMap {
    /// Create a timing map. Fails fast on a non-positive or non-finite BPM
    /// and on a zero beats-per-bar so conversions can never produce
    /// non-finite results.
    pub fn new(bpm: f64, beats_per_bar: u32, offset_sec: f64) -> Result<Self, TimingError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(TimingError::InvalidBpm { bpm });
        }
        if beats_per_bar == 0 {
            return Err(TimingError::InvalidBeatsPerBar);
        }

        debug!("timing map: {bpm} BPM, {beats_per_bar} beats/bar, offset {offset_sec}s");

        Ok(Self {
            bpm,
            beats_per_bar,
            offset_sec,
        })
    }

    /// Get the BPM.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Get the number of beats per bar (e.g. 4 for 4/4).
    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    /// Get the offset of chart beat 0 from audio start, in seconds.
    pub fn offset_sec(&self) -> f64 {
        self.offset_sec
    }

    /// Duration of one beat in seconds.
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Convert a song time in seconds to a beat position.
    pub fn beat_from_song_time(&self, song_time_sec: f64) -> f64 {
        (song_time_sec - self.offset_sec) / self.seconds_per_beat()
    }

    /// Convert a beat position to a song time in seconds.
    pub fn song_time_from_beat(&self, beat: f64) -> f64 {
        self.offset_sec + beat * self.seconds_per_beat()
    }

    /// Bar index containing the given beat. Negative beats yield negative
    /// bar indices.
    pub fn bar_from_beat(&self, beat: f64) -> i64 {
        (beat / self.beats_per_bar as f64).floor() as i64
    }

    /// Position of the beat within its bar, always in `[0, beats_per_bar)`.
    pub fn beat_in_bar(&self, beat: f64) -> f64 {
        beat.rem_euclid(self.beats_per_bar as f64)
    }
}

impl Default for TimingMap {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            beats_per_bar: 4,
            offset_sec: 0.0,
        }
    }
}
