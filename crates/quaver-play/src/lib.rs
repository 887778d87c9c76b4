//! Gameplay core for a four-lane rhythm game.
//!
//! Everything here is synchronous and tick-driven: an external loop feeds a
//! [`Session`] the current song position, per-lane press events and the
//! frame's elapsed time, and reads back the [`ScoreState`] snapshot.
//! Rendering, audio and input polling live outside this crate.

pub mod autoplay;
pub mod chart;
pub mod config;
pub mod error;
pub mod judge;
pub mod note;
pub mod score;
pub mod session;

pub use autoplay::{AutoplayMode, PressEvent, ScriptedInput};
pub use chart::Chart;
pub use config::PlayConfig;
pub use error::PlayError;
pub use judge::{HitWindows, Judge};
pub use note::{LANE_COUNT, Note, PositionUnit};
pub use score::{AUTO_MISS_DT_MS, ScoreState};
pub use session::{Session, SessionPhase};
