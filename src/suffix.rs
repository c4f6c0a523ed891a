//! Suffix array and LCP array construction over pitch-class sequences.
//!
//! Suffixes are ordered with shorter-is-smaller semantics on prefix ties,
//! as if the sequence ended with a sentinel below every symbol.

/// Prefix-doubling suffix array, O(n log² n).
pub fn suffix_array(seq: &[u8]) -> Vec<usize> {
    let n = seq.len();
    if n == 0 {
        return Vec::new();
    }

    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = seq.iter().map(|&c| usize::from(c)).collect();
    let mut next_rank = vec![0; n];
    let mut k = 1;

    loop {
        // None < Some(_), so a suffix with no k-extension sorts first
        let key = |i: usize| (rank[i], if i + k < n { Some(rank[i + k]) } else { None });

        sa.sort_unstable_by_key(|&i| key(i));

        next_rank[sa[0]] = 0;
        for w in 1..n {
            next_rank[sa[w]] = next_rank[sa[w - 1]] + usize::from(key(sa[w]) != key(sa[w - 1]));
        }
        let done = next_rank[sa[n - 1]] == n - 1;
        rank.copy_from_slice(&next_rank);
        if done {
            return sa;
        }
        k *= 2;
    }
}

/// Comparison-sort baseline, kept as the correctness oracle for the
/// doubling construction.
pub fn suffix_array_naive(seq: &[u8]) -> Vec<usize> {
    let mut sa: Vec<usize> = (0..seq.len()).collect();
    sa.sort_unstable_by(|&a, &b| seq[a..].cmp(&seq[b..]));
    sa
}

/// Inverse of the suffix array: rank[sa[i]] = i.
pub fn rank_array(sa: &[usize]) -> Vec<usize> {
    let mut rank = vec![0; sa.len()];
    for (i, &s) in sa.iter().enumerate() {
        rank[s] = i;
    }
    rank
}

/// Kasai's LCP construction. lcp[i] is the longest common prefix of the
/// suffixes at sa[i] and sa[i + 1]; the array is empty when n ≤ 1.
///
/// The running match length h is carried between consecutive sequence
/// positions and only ever shrinks by one per step, which is what makes
/// the total work linear.
pub fn lcp_array(seq: &[u8], sa: &[usize], rank: &[usize]) -> Vec<usize> {
    let n = seq.len();
    let mut lcp = vec![0; n.saturating_sub(1)];
    let mut h = 0;

    for i in 0..n {
        if rank[i] == 0 {
            h = 0;
            continue;
        }
        let j = sa[rank[i] - 1];
        while i + h < n && j + h < n && seq[i + h] == seq[j + h] {
            h += 1;
        }
        lcp[rank[i] - 1] = h;
        h = h.saturating_sub(1);
    }

    lcp
}
