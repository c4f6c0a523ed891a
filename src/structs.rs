use std::fs;

use anyhow::{Context, Result};
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct RunSettings {
    pub min_repeat_length:       usize,
    pub ngram_size:              usize,
    pub short_duration_thresh:   f64,
    pub dominant_pitch_ratio:    f64,
    pub window_size:             usize,
    pub window_diversity_thresh: usize,
    pub low_diversity_ratio:     f64,
    pub duration_tolerance:      f64,
    pub interval_tolerance:      f64,
    pub similarity_threshold:    f64,

    #[serde(skip_serializing)]
    #[serde(default)]
    pub threads_count:           usize,
}

impl Default for RunSettings {
    fn default() -> RunSettings {
        RunSettings {
            min_repeat_length:       5,
            ngram_size:              3,
            short_duration_thresh:   0.0725,
            dominant_pitch_ratio:    0.8,
            window_size:             9,
            window_diversity_thresh: 3,
            low_diversity_ratio:     0.8,
            duration_tolerance:      0.05,
            interval_tolerance:      0.05,
            similarity_threshold:    0.9,
            threads_count:           0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Note {
    pub pitch: u8,
    pub start: f64,
    pub end:   f64,
}

impl Note {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Pitch class in 1..=12.
    pub fn chroma(&self) -> u8 {
        self.pitch % 12 + 1
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Track {
    #[serde(default)]
    pub instrument: String,
    #[serde(default)]
    pub is_drum:    bool,
    pub notes:      Vec<Note>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Song {
    #[serde(default)]
    pub title:  String,
    pub tracks: Vec<Track>,
}

impl Song {
    pub fn from_file(filename: &str) -> Result<Song> {
        let s = fs::read_to_string(filename)
            .with_context(|| format!("Unable to open `{}`", filename))?;
        serde_json::from_str(&s)
            .with_context(|| format!("Unable to read `{}`: not a song file", filename))
    }
}

/// A repeated pitch-class substring and every position it starts at.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Repeat {
    pub symbols:   Vec<u8>,
    pub positions: Vec<usize>,
}

impl Repeat {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn cardinality(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackAnalysis {
    pub instrument:      String,
    pub is_drum:         bool,
    pub chroma:          Vec<u8>,
    pub pitch_intervals: Vec<i16>,
    pub interval_ngrams: Vec<Vec<i16>>,
    pub repeats:         Vec<Repeat>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RunResult {
    pub song:     String,
    pub settings: RunSettings,
    pub tracks:   Vec<TrackAnalysis>,
}

impl RunResult {
    pub fn from_file(filename: &str) -> Result<RunResult> {
        let s = fs::read_to_string(filename)
            .with_context(|| format!("Unable to open `{}`", filename))?;
        serde_json::from_str(&s).with_context(|| "Failed to parse JSON")
    }

    pub fn repeat_count(&self) -> usize {
        self.tracks.iter().map(|t| t.repeats.len()).sum()
    }
}
