use std::cmp::Ordering;

use superslice::Ext;

/// Locates every start position of a pattern by binary search over the
/// suffix array already built for the sequence.
pub struct Searcher<'a> {
    seq: &'a [u8],
    sa:  &'a [usize],
}

impl<'a> Searcher<'a> {
    pub fn new(seq: &'a [u8], sa: &'a [usize]) -> Searcher<'a> {
        Searcher { seq, sa }
    }

    /// All start positions of `pattern`, ascending. Agrees exactly with
    /// the direct scan in [`occurrences`].
    pub fn positions(&self, pattern: &[u8]) -> Vec<usize> {
        if pattern.is_empty() || pattern.len() > self.seq.len() {
            return Vec::new();
        }

        let range = self.sa.equal_range_by(|&p| {
            let suffix = &self.seq[p..];
            if suffix.len() >= pattern.len() {
                suffix[..pattern.len()].cmp(pattern)
            } else {
                // a suffix shorter than the pattern sorts before it
                // whenever the overlap ties
                suffix.cmp(&pattern[..suffix.len()]).then(Ordering::Less)
            }
        });

        let mut positions = self.sa[range].to_vec();
        positions.sort_unstable();
        positions
    }
}

/// Reference locator: scan and compare every candidate start position.
pub fn occurrences(seq: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > seq.len() {
        return Vec::new();
    }
    seq.windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| *window == pattern)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix::suffix_array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn scan_finds_all_starts_in_order() {
        let seq = [1u8, 2, 3, 1, 2, 3, 4];
        assert_eq!(occurrences(&seq, &[1, 2, 3]), vec![0, 3]);
        assert_eq!(occurrences(&seq, &[1, 2]), vec![0, 3]);
        assert_eq!(occurrences(&seq, &[4]), vec![6]);
        assert_eq!(occurrences(&seq, &[7]), Vec::<usize>::new());
    }

    #[test]
    fn overlapping_matches_count() {
        let seq = [5u8, 5, 5, 5];
        assert_eq!(occurrences(&seq, &[5, 5]), vec![0, 1, 2]);
    }

    #[test]
    fn pattern_longer_than_sequence() {
        assert!(occurrences(&[1u8, 2], &[1, 2, 3]).is_empty());
    }

    #[test]
    fn searcher_agrees_with_scan() {
        let mut rng = StdRng::seed_from_u64(0xbeef);
        for _ in 0..32 {
            let len = rng.gen_range(2..40);
            let seq: Vec<u8> = (0..len).map(|_| rng.gen_range(1..=3)).collect();
            let sa = suffix_array(&seq);
            let searcher = Searcher::new(&seq, &sa);
            for plen in 1..=4.min(len) {
                let start = rng.gen_range(0..=len - plen);
                let pattern = &seq[start..start + plen];
                assert_eq!(
                    searcher.positions(pattern),
                    occurrences(&seq, pattern),
                    "seq: {:?}, pattern: {:?}",
                    seq,
                    pattern
                );
            }
        }
    }

    #[test]
    fn searcher_on_absent_pattern() {
        let seq = [1u8, 2, 3, 1, 2, 3, 4];
        let sa = suffix_array(&seq);
        let searcher = Searcher::new(&seq, &sa);
        assert!(searcher.positions(&[9, 9]).is_empty());
        assert!(searcher.positions(&[]).is_empty());
    }
}
