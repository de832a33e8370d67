use indexmap::IndexMap;

use crate::libs::seed::{SeedIndex, KMER_LEN};

/// A run of database windows whose 11-mers all hit the query index at
/// consecutive positions.
///
/// `end` and `start` are window offsets in the database sequence, `len`
/// counts the matched windows, and `query_offset` is the recorded
/// (1-based) offset of the first matched window's earliest occurrence in
/// the query. The all-zero value doubles as "no chain".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub end: usize,
    pub start: usize,
    pub len: usize,
    pub query_offset: usize,
}

impl Chain {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Scans `target` with an 11-symbol sliding window against `index` and
/// returns the longest and second-longest chains of consecutive hits.
///
/// A window at offset `y` extends the chain terminating at `y - 1` if
/// one is open, otherwise it opens a fresh chain of length 1. Selection
/// runs over the chains in completion order with strict `>`, so a later
/// chain of equal length never displaces an earlier pick.
pub fn scan(target: &[u8], index: &SeedIndex) -> (Chain, Chain) {
    // terminal window offset -> (start, len, query_offset)
    let mut open: IndexMap<usize, (usize, usize, usize)> = IndexMap::new();

    for (y, win) in target.windows(KMER_LEN).enumerate() {
        let offsets = match index.get(win) {
            Some(offsets) => offsets,
            None => continue,
        };

        let prev = if y > 0 { open.shift_remove(&(y - 1)) } else { None };
        match prev {
            Some((start, len, query_offset)) => {
                open.insert(y, (start, len + 1, query_offset));
            }
            None => {
                open.insert(y, (y, 1, offsets[0]));
            }
        }
    }

    let mut longest = Chain::default();
    let mut second = Chain::default();
    for (&end, &(start, len, query_offset)) in &open {
        let chain = Chain {
            end,
            start,
            len,
            query_offset,
        };
        if chain.len > longest.len {
            second = longest;
            longest = chain;
        } else if chain.len > second.len {
            second = chain;
        }
    }

    (longest, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match() {
        let index = SeedIndex::build(b"ACGTACGTACGTACGT");
        let (longest, second) = scan(b"TTTTTTTTTTTTTTTT", &index);
        assert!(longest.is_empty());
        assert!(second.is_empty());
    }

    #[test]
    fn test_single_chain_identical() {
        let seq = b"ACGTACGTACGTACGT"; // 16 symbols, 6 windows
        let index = SeedIndex::build(seq);
        let (longest, second) = scan(seq, &index);

        assert_eq!(
            longest,
            Chain {
                end: 5,
                start: 0,
                len: 6,
                query_offset: 1,
            }
        );
        assert!(second.is_empty());
    }

    #[test]
    fn test_two_chains_around_a_substitution() {
        // 40 bp query; the target differs at position 20, which breaks
        // the windows overlapping it into two runs
        let query = b"ACGTTGCAATCCGGAATTGGCCAATTCGATCGGATCCTAG";
        let mut target = query.to_vec();
        target[20] = b'T'; // was 'C'

        let index = SeedIndex::build(query);
        let (longest, second) = scan(&target, &index);

        // Windows 0..=9 survive on the left, 21..=29 on the right
        assert_eq!(
            longest,
            Chain {
                end: 9,
                start: 0,
                len: 10,
                query_offset: 1,
            }
        );
        assert_eq!(
            second,
            Chain {
                end: 29,
                start: 21,
                len: 9,
                query_offset: 22,
            }
        );
    }

    #[test]
    fn test_equal_length_keeps_first() {
        // Two disjoint copies of the same 12 bp block give two chains of
        // identical length; the earlier one must stay in front
        let query = b"ACGTTGCAATCC";
        let mut target = Vec::new();
        target.extend_from_slice(query);
        target.extend_from_slice(b"GGGGGGGGGGGG");
        target.extend_from_slice(query);

        let index = SeedIndex::build(query);
        let (longest, second) = scan(&target, &index);

        assert_eq!(longest.len, 2);
        assert_eq!(second.len, 2);
        assert_eq!(longest.start, 0);
        assert_eq!(second.start, 24);
    }

    #[test]
    fn test_extension_is_monotonic() {
        let query = b"ACGTTGCAATCCGGAATTGGCC";
        let index = SeedIndex::build(query);

        let mut target = query[..15].to_vec();
        let (before, _) = scan(&target, &index);

        target.extend_from_slice(&query[15..]);
        let (after, _) = scan(&target, &index);

        assert!(after.len >= before.len);
        assert_eq!(before.len, 5);
        assert_eq!(after.len, 12);
    }
}
