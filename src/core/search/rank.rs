use std::thread;

use tracing::debug;

use super::fuzzy::match_positions;

/// A matching candidate, identified by its position in the input slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMatch {
    pub index: usize,
    pub score: i64,
    pub ranges: Vec<(usize, usize)>,
}

pub fn ranked_matches(query: &str, candidates: &[String]) -> Vec<RankedMatch> {
    rank_by(query, candidates, String::as_str)
}

/// Matches every item's name against `query`, drops the misses and orders
/// the rest by score, best first. Equal scores keep their input order.
pub fn rank_by<T>(query: &str, items: &[T], name: impl Fn(&T) -> &str) -> Vec<RankedMatch> {
    let mut matches = score_chunk(query, items, 0, &name);
    sort_matches(&mut matches);
    debug!(
        query,
        candidates = items.len(),
        matched = matches.len(),
        "ranked candidates"
    );
    matches
}

pub fn rank_limited<T>(
    query: &str,
    items: &[T],
    limit: usize,
    name: impl Fn(&T) -> &str,
) -> Vec<RankedMatch> {
    if limit == 0 {
        return Vec::new();
    }
    let mut matches = rank_by(query, items, name);
    matches.truncate(limit);
    matches
}

/// Same ordering as [`rank_by`], with scoring spread over `workers` threads.
///
/// Each worker scores one contiguous chunk. Chunks are concatenated in input
/// order before the single stable sort, so nothing is observable until the
/// merge is done.
pub fn rank_parallel<T: Sync>(
    query: &str,
    items: &[T],
    workers: usize,
    name: impl Fn(&T) -> &str + Sync,
) -> Vec<RankedMatch> {
    let workers = workers.max(1);
    if workers == 1 || items.len() < workers * 2 {
        return rank_by(query, items, name);
    }

    let chunk_len = items.len().div_ceil(workers);
    let name = &name;
    let mut matches: Vec<RankedMatch> = thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk_len)
            .enumerate()
            .map(|(chunk, slice)| {
                scope.spawn(move || score_chunk(query, slice, chunk * chunk_len, name))
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(chunk) => chunk,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    sort_matches(&mut matches);
    debug!(
        query,
        candidates = items.len(),
        matched = matches.len(),
        workers,
        "ranked candidates in parallel"
    );
    matches
}

fn score_chunk<T>(
    query: &str,
    items: &[T],
    offset: usize,
    name: &impl Fn(&T) -> &str,
) -> Vec<RankedMatch> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            match_positions(query, name(item)).map(|found| RankedMatch {
                index: offset + index,
                score: found.score,
                ranges: found.ranges,
            })
        })
        .collect()
}

fn sort_matches(matches: &mut [RankedMatch]) {
    matches.sort_by(|a, b| b.score.cmp(&a.score));
}
