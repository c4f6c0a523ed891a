//! Heuristics that weed out tracks unlikely to carry a melody before the
//! repeat analysis runs. Thresholds live in `RunSettings`.

use std::collections::{HashMap, HashSet};

use crate::structs::{Note, RunSettings};

/// True for tracks dominated by very short notes, by a single pitch, or by
/// long stretches of low pitch diversity.
pub fn should_exclude(notes: &[Note], settings: &RunSettings) -> bool {
    if notes.is_empty() {
        return false;
    }

    let avg_duration =
        notes.iter().map(Note::duration).sum::<f64>() / notes.len() as f64;
    if avg_duration <= settings.short_duration_thresh {
        return true;
    }

    let pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
    let mut counts: HashMap<u8, usize> = HashMap::new();
    for &p in &pitches {
        *counts.entry(p).or_insert(0) += 1;
    }
    let dominant = counts.values().copied().max().unwrap_or(0);
    if dominant as f64 / pitches.len() as f64 >= settings.dominant_pitch_ratio {
        return true;
    }

    if pitches.len() >= settings.window_size {
        let total_windows = pitches.len() - settings.window_size + 1;
        let low_diversity_windows = pitches
            .windows(settings.window_size)
            .filter(|w| {
                let distinct: HashSet<u8> = w.iter().copied().collect();
                distinct.len() < settings.window_diversity_thresh
            })
            .count();
        if total_windows > 0
            && low_diversity_windows as f64 / total_windows as f64
                >= settings.low_diversity_ratio
        {
            return true;
        }
    }

    false
}

/// True when both note durations and inter-onset gaps stay within
/// tolerance of their means. Expects notes in onset order.
pub fn is_monotonous(notes: &[Note], settings: &RunSettings) -> bool {
    if notes.len() < 2 {
        return false;
    }

    let durations: Vec<f64> = notes.iter().map(Note::duration).collect();
    let gaps: Vec<f64> = notes.windows(2).map(|w| w[1].start - w[0].start).collect();

    let avg_duration = durations.iter().sum::<f64>() / durations.len() as f64;
    let avg_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;

    durations
        .iter()
        .all(|d| (d - avg_duration).abs() <= settings.duration_tolerance)
        && gaps
            .iter()
            .all(|g| (g - avg_gap).abs() <= settings.interval_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch: u8, start: f64, end: f64) -> Note {
        Note { pitch, start, end }
    }

    fn melody() -> Vec<Note> {
        // varied pitches, durations and gaps
        let pitches = [60u8, 64, 67, 72, 65, 62, 69, 71, 59, 66, 63, 68];
        let mut start = 0.0;
        pitches
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let n = note(p, start, start + 0.25 + 0.12 * (i % 3) as f64);
                start += 0.2 + 0.15 * (i % 2) as f64;
                n
            })
            .collect()
    }

    #[test]
    fn a_real_melody_survives() {
        let settings = RunSettings::default();
        let notes = melody();
        assert!(!should_exclude(&notes, &settings));
        assert!(!is_monotonous(&notes, &settings));
    }

    #[test]
    fn empty_track_is_not_excluded_here() {
        // empty tracks are dropped earlier, before the heuristics run
        assert!(!should_exclude(&[], &RunSettings::default()));
        assert!(!is_monotonous(&[], &RunSettings::default()));
    }

    #[test]
    fn short_notes_are_excluded() {
        let settings = RunSettings::default();
        let notes: Vec<Note> = (0..10)
            .map(|i| note(60 + i, i as f64 * 0.5, i as f64 * 0.5 + 0.05))
            .collect();
        assert!(should_exclude(&notes, &settings));
    }

    #[test]
    fn dominant_pitch_is_excluded() {
        let settings = RunSettings::default();
        let mut notes: Vec<Note> = (0..9)
            .map(|i| note(60, i as f64 * 0.37, i as f64 * 0.37 + 0.3 + 0.02 * (i % 2) as f64))
            .collect();
        notes.push(note(64, 9.0 * 0.37, 9.0 * 0.37 + 0.3));
        assert!(should_exclude(&notes, &settings));
    }

    #[test]
    fn low_diversity_windows_are_excluded() {
        let settings = RunSettings::default();
        // alternating two pitches: every window holds 2 < 3 distinct codes
        let notes: Vec<Note> = (0..20)
            .map(|i| {
                let p = if i % 2 == 0 { 60 } else { 62 };
                note(p, i as f64 * 0.41, i as f64 * 0.41 + 0.25 + 0.03 * (i % 3) as f64)
            })
            .collect();
        assert!(should_exclude(&notes, &settings));
    }

    #[test]
    fn metronomic_track_is_monotonous() {
        let settings = RunSettings::default();
        let notes: Vec<Note> = (0..12)
            .map(|i| note(60 + (i % 5) as u8 * 2, i as f64 * 0.25, i as f64 * 0.25 + 0.2))
            .collect();
        assert!(is_monotonous(&notes, &settings));
    }
}
