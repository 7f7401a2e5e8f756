//! Background music sequencing
//!
//! Music is a short looping note sequence per level. The notes themselves are
//! synthesized by the audio collaborator; the core only decides when each
//! note sounds.

use serde::Serialize;

/// Note sequence and tempo for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MusicTrack {
    /// Frequencies in Hz, looped
    pub notes: &'static [f32],
    /// Frames between notes
    pub period_frames: u64,
    /// Length of each note in seconds
    pub note_duration: f32,
}

const LEVEL_1_NOTES: [f32; 4] = [261.63, 293.66, 329.63, 349.23];
const LEVEL_2_NOTES: [f32; 4] = [220.0, 261.63, 329.63, 440.0];
const LEVEL_3_NOTES: [f32; 4] = [110.0, 116.54, 110.0, 103.83];

impl MusicTrack {
    pub fn for_level(level: u8) -> Self {
        let (notes, period_frames): (&'static [f32], u64) = match level {
            1 => (&LEVEL_1_NOTES, 12),
            2 => (&LEVEL_2_NOTES, 12),
            _ => (&LEVEL_3_NOTES, 6),
        };
        Self {
            notes,
            period_frames,
            note_duration: 0.1,
        }
    }
}

/// A running track
#[derive(Debug, Clone, Serialize)]
pub struct MusicPlayer {
    pub track: MusicTrack,
    pub level: u8,
    /// Distinguishes this run from earlier ones so stale notes can be ignored
    pub generation: u32,
    next_note: usize,
}

impl MusicPlayer {
    pub fn new(level: u8, generation: u32) -> Self {
        Self {
            track: MusicTrack::for_level(level),
            level,
            generation,
            next_note: 0,
        }
    }

    /// Current note frequency; advances the sequence
    pub fn advance(&mut self) -> f32 {
        let freq = self.track.notes[self.next_note];
        self.next_note = (self.next_note + 1) % self.track.notes.len();
        freq
    }
}
