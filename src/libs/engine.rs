use rayon::prelude::*;

use crate::libs::align;
use crate::libs::chain;
use crate::libs::rank::{Hit, HitSet};
use crate::libs::scoring::ScoreMatrix;
use crate::libs::seed::{SeedIndex, KMER_LEN};

/// A chain of n windows spans n + 10 symbols of sequence.
const CHAIN_SPAN_PAD: usize = KMER_LEN - 1;

/// A lone chain qualifies only when longer than this.
const LONGEST_LEN_MIN: usize = 90;

/// With two chains, the second must be longer than this.
const SECOND_LEN_MIN: usize = 3;

/// One query with its prebuilt seed index.
pub struct Query {
    pub label: String,
    pub seq: Vec<u8>,
    index: SeedIndex,
}

/// Drives the search of a fixed query set against database sequences,
/// one sequence at a time.
pub struct Engine {
    queries: Vec<Query>,
    matrix: ScoreMatrix,
    hits: HitSet,
}

impl Engine {
    /// Interns the queries and builds each seed index once; the indexes
    /// are reused for every database sequence.
    pub fn new(labels: Vec<String>, seqs: Vec<Vec<u8>>) -> Self {
        let queries: Vec<Query> = labels
            .into_iter()
            .zip(seqs)
            .map(|(label, seq)| {
                let index = SeedIndex::build(&seq);
                Query { label, seq, index }
            })
            .collect();
        let hits = HitSet::new(queries.len());

        Engine {
            queries,
            matrix: ScoreMatrix::default(),
            hits,
        }
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn hits(&self) -> &HitSet {
        &self.hits
    }

    /// Evaluates every query against one database sequence. Candidate
    /// hits are computed in parallel (all state is per-query); bucket
    /// insertions then run serially in query order.
    pub fn process(&mut self, target_label: &str, target: &[u8]) {
        let candidates: Vec<Option<Hit>> = self
            .queries
            .par_iter()
            .map(|query| score_pair(query, target_label, target, &self.matrix))
            .collect();

        for (query_id, candidate) in candidates.into_iter().enumerate() {
            if let Some(hit) = candidate {
                self.hits.insert(query_id, hit);
            }
        }
    }
}

/// Chain scan, threshold decision, and scoring for one (query, target)
/// pair. Returns None when the pair produces no record.
fn score_pair(
    query: &Query,
    target_label: &str,
    target: &[u8],
    matrix: &ScoreMatrix,
) -> Option<Hit> {
    let (longest, second) = chain::scan(target, &query.index);

    if longest.len <= LONGEST_LEN_MIN && second.len <= SECOND_LEN_MIN {
        return None;
    }

    let hit = |score: i32, aligned: String| Hit {
        target: target_label.to_string(),
        score,
        aligned,
        query_len: query.seq.len(),
        target_len: target.len(),
    };

    // One dominant anchor: score it as a perfect run without DP
    if second.is_empty() {
        let span = longest.len + CHAIN_SPAN_PAD;
        let aligned = window(
            &query.seq,
            longest.query_offset,
            longest.query_offset + span,
        );
        let score = (span * 5) as i32;
        return Some(hit(score, String::from_utf8_lossy(aligned).into_owned()));
    }

    // Two anchors: bound windows around them and align. Window ends are
    // clamped and an inverted range yields an empty window.
    let t_win = window(target, longest.start, second.end + CHAIN_SPAN_PAD);
    let q_win = window(
        &query.seq,
        longest.query_offset,
        second.query_offset + second.len + CHAIN_SPAN_PAD,
    );

    let q_win = if longest.end < second.start && q_win.len() > 1 && t_win.len() > 1 {
        q_win
    } else {
        let alt = window(
            &query.seq,
            second.query_offset,
            longest.query_offset + second.len + CHAIN_SPAN_PAD,
        );
        if alt.len() > 1 && t_win.len() > 1 {
            alt
        } else {
            return None;
        }
    };

    let aln = align::align(q_win, t_win, matrix);
    Some(hit(aln.score, aln.aligned))
}

/// `seq[start..end]` that never panics: the end is clamped to the
/// sequence length and an inverted range yields an empty slice.
fn window(seq: &[u8], start: usize, end: usize) -> &[u8] {
    let end = end.min(seq.len());
    if start >= end {
        &[]
    } else {
        &seq[start..end]
    }
}
