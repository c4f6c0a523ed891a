//! Per-track and per-song analysis drivers: filter, encode, extract.

use log::*;
use rayon::prelude::*;

use crate::chroma;
use crate::filters;
use crate::repeats::find_repeats;
use crate::structs::{RunSettings, Song, Track, TrackAnalysis, RunResult};

/// Runs the full pipeline on one track. Returns None when the track is
/// judged melodically degenerate and skipped.
pub fn analyze_track(track: &Track, settings: &RunSettings) -> Option<TrackAnalysis> {
    let mut notes = track.notes.clone();
    notes.sort_by(|a, b| a.start.total_cmp(&b.start));

    if notes.is_empty() {
        return None;
    }
    if filters::should_exclude(&notes, settings) || filters::is_monotonous(&notes, settings) {
        debug!("Skipping degenerate track `{}`", track.instrument);
        return None;
    }

    let chroma = chroma::encode(&notes);
    let repeats = find_repeats(&chroma, settings.min_repeat_length.max(1));
    let pitch_intervals = chroma::pitch_intervals(&notes);
    let interval_ngrams = chroma::interval_ngrams(&pitch_intervals, settings.ngram_size);

    Some(TrackAnalysis {
        instrument: track.instrument.clone(),
        is_drum: track.is_drum,
        chroma,
        pitch_intervals,
        interval_ngrams,
        repeats,
    })
}

/// Analyzes every track of a song; tracks are independent and run in
/// parallel, each owning its own index state.
pub fn analyze_song(song: &Song, settings: &RunSettings) -> RunResult {
    let tracks: Vec<TrackAnalysis> = song
        .tracks
        .par_iter()
        .filter_map(|track| analyze_track(track, settings))
        .collect();

    RunResult {
        song: song.title.clone(),
        settings: *settings,
        tracks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::Note;

    fn track_from_pitches(pitches: &[u8]) -> Track {
        let mut start = 0.0;
        let notes = pitches
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let n = Note { pitch: p, start, end: start + 0.25 + 0.1 * (i % 2) as f64 };
                start += 0.2 + 0.15 * (i % 3) as f64;
                n
            })
            .collect();
        Track { instrument: "Lead".to_owned(), is_drum: false, notes }
    }

    #[test]
    fn repeated_phrase_is_found_in_context() {
        // phrase C E G A repeated twice amid varied filler
        let track = track_from_pitches(&[
            60, 64, 67, 69, 62, 71, 66, 60, 64, 67, 69, 65, 59, 68,
        ]);
        let settings = RunSettings { min_repeat_length: 4, ..RunSettings::default() };

        let analysis = analyze_track(&track, &settings).expect("track should survive filters");
        assert!(analysis
            .repeats
            .iter()
            .any(|r| r.symbols == vec![1, 5, 8, 10] && r.positions == vec![0, 7]));
    }

    #[test]
    fn empty_and_degenerate_tracks_are_dropped() {
        let settings = RunSettings::default();
        let empty = Track { instrument: String::new(), is_drum: false, notes: Vec::new() };
        assert!(analyze_track(&empty, &settings).is_none());

        let flat = track_from_pitches(&[60; 24]);
        assert!(analyze_track(&flat, &settings).is_none());
    }

    #[test]
    fn song_analysis_keeps_surviving_tracks_only() {
        let settings = RunSettings { min_repeat_length: 3, ..RunSettings::default() };
        let song = Song {
            title: "Test Song".to_owned(),
            tracks: vec![
                track_from_pitches(&[60, 64, 67, 62, 71, 60, 64, 67, 69, 66, 59, 65]),
                track_from_pitches(&[60; 24]),
            ],
        };
        let result = analyze_song(&song, &settings);
        assert_eq!(result.song, "Test Song");
        assert_eq!(result.tracks.len(), 1);
    }
}
