//! Pitch-class and interval encodings of note sequences.

use crate::structs::Note;

/// Pitch-class codes (1..=12), one per note, in the notes' given order.
pub fn encode(notes: &[Note]) -> Vec<u8> {
    notes.iter().map(Note::chroma).collect()
}

/// Signed pitch differences between consecutive notes.
pub fn pitch_intervals(notes: &[Note]) -> Vec<i16> {
    notes
        .windows(2)
        .map(|w| i16::from(w[1].pitch) - i16::from(w[0].pitch))
        .collect()
}

/// Sliding windows of `n` consecutive intervals.
pub fn interval_ngrams(intervals: &[i16], n: usize) -> Vec<Vec<i16>> {
    if n == 0 || intervals.len() < n {
        return Vec::new();
    }
    intervals.windows(n).map(<[i16]>::to_vec).collect()
}
