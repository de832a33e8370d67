use fxhash::FxHashMap;

/// Window length for exact seed matching.
pub const KMER_LEN: usize = 11;

/// Exact-match index of one query sequence.
///
/// Maps every 11-mer of the query to the ordered list of its 1-based
/// start offsets. The index is built once per query and reused for every
/// database sequence; the recorded offsets never change between scans.
#[derive(Debug, Default)]
pub struct SeedIndex {
    map: FxHashMap<[u8; KMER_LEN], Vec<usize>>,
}

impl SeedIndex {
    /// Indexes all 11-mers of `seq`. A sequence shorter than 11 symbols
    /// yields an empty index.
    pub fn build(seq: &[u8]) -> Self {
        let mut map: FxHashMap<[u8; KMER_LEN], Vec<usize>> = FxHashMap::default();

        for (i, win) in seq.windows(KMER_LEN).enumerate() {
            let mut kmer = [0u8; KMER_LEN];
            kmer.copy_from_slice(win);
            // Offsets are recorded 1-based, in scan order
            map.entry(kmer).or_default().push(i + 1);
        }

        SeedIndex { map }
    }

    /// Offsets of `win` in the indexed query, if it occurs at all.
    pub fn get(&self, win: &[u8]) -> Option<&[usize]> {
        if win.len() != KMER_LEN {
            return None;
        }
        let mut kmer = [0u8; KMER_LEN];
        kmer.copy_from_slice(win);
        self.map.get(&kmer).map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_empty() {
        let idx = SeedIndex::build(b"ACGTACGTAC"); // 10 < 11
        assert!(idx.is_empty());
    }

    #[test]
    fn test_offsets_are_one_based() {
        // 16 symbols, 6 windows; the 4-periodic sequence repeats its
        // 11-mers at distance 4
        let idx = SeedIndex::build(b"ACGTACGTACGTACGT");

        assert_eq!(idx.get(b"ACGTACGTACG"), Some(&[1, 5][..]));
        assert_eq!(idx.get(b"CGTACGTACGT"), Some(&[2, 6][..]));
        assert_eq!(idx.get(b"GTACGTACGTA"), Some(&[3][..]));
        assert_eq!(idx.get(b"TACGTACGTAC"), Some(&[4][..]));
        assert_eq!(idx.get(b"AAAAAAAAAAA"), None);
    }

    #[test]
    fn test_insertion_count() {
        // A sequence of length L yields exactly L - 10 offset insertions
        let seq = b"AACCGGTTAACCGGTTAACC";
        let idx = SeedIndex::build(seq);

        let mut inserted = 0;
        let mut seen = std::collections::HashSet::new();
        for i in 0..=seq.len() - KMER_LEN {
            let win = &seq[i..i + KMER_LEN];
            if seen.insert(win.to_vec()) {
                inserted += idx.get(win).unwrap().len();
            }
        }
        assert_eq!(inserted, seq.len() - 10);

        for i in 0..=seq.len() - KMER_LEN {
            for &ofs in idx.get(&seq[i..i + KMER_LEN]).unwrap() {
                assert!((1..=seq.len() - 10).contains(&ofs));
            }
        }
    }
}
