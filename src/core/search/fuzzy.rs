//! Case-insensitive fuzzy subsequence matching.
//!
//! A pattern matches a text when every pattern character appears in the text
//! in the same relative order. The score accumulates over the matched
//! characters: a baseline per character, a bonus for runs of consecutive
//! characters and for characters that start a word, and penalties for the
//! unmatched characters before, between and after the match.
//!
//! Every call is linear in the length of the text.

const SCORE_MATCH: i64 = 16;
const BONUS_CONSECUTIVE: i64 = 12;
const BONUS_BOUNDARY: i64 = 10;
const BONUS_FIRST_CHAR_MULTIPLIER: i64 = 2;
const PENALTY_GAP_START: i64 = 3;
const PENALTY_GAP_EXTENSION: i64 = 1;
const PENALTY_LEADING: i64 = 1;
const TRAILING_DIVISOR: i64 = 4;

/// Outcome of matching one pattern against one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub matched: bool,
    pub score: i64,
}

impl MatchScore {
    pub const MISS: Self = Self {
        matched: false,
        score: 0,
    };
}

/// A successful match with the char positions used for highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub score: i64,
    pub matched_indices: Vec<usize>,
    /// Half-open char ranges covering `matched_indices`.
    pub ranges: Vec<(usize, usize)>,
}

/// Scores `text` against `pattern`.
///
/// An empty pattern matches everything with a score of zero; callers are
/// expected to handle the empty query before getting here.
pub fn fuzzy_match(pattern: &str, text: &str) -> MatchScore {
    match best_alignment(pattern, text) {
        Some(alignment) => MatchScore {
            matched: true,
            score: alignment.score,
        },
        None => MatchScore::MISS,
    }
}

pub fn match_positions(pattern: &str, text: &str) -> Option<FuzzyMatch> {
    let alignment = best_alignment(pattern, text)?;
    let ranges = indices_to_ranges(&alignment.indices);
    Some(FuzzyMatch {
        score: alignment.score,
        matched_indices: alignment.indices,
        ranges,
    })
}

struct Alignment {
    score: i64,
    indices: Vec<usize>,
}

fn best_alignment(pattern: &str, text: &str) -> Option<Alignment> {
    let pattern: Vec<char> = pattern.chars().map(fold_case).collect();
    if pattern.is_empty() {
        return Some(Alignment {
            score: 0,
            indices: Vec::new(),
        });
    }

    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold_case).collect();

    let end = forward_end(&pattern, &folded)?;
    let indices = backward_positions(&pattern, &folded, end);
    let mut best = Alignment {
        score: score_positions(&chars, &indices),
        indices,
    };

    // A contiguous occurrence further right can beat the tightest subsequence
    // window, e.g. "app" in "a_p_p_app".
    let folded_text: String = folded.iter().collect();
    let folded_pattern: String = pattern.iter().collect();
    let mut window = Vec::with_capacity(pattern.len());
    for start in contiguous_starts(&folded_text, &folded_pattern) {
        window.clear();
        window.extend(start..start + pattern.len());
        let score = score_positions(&chars, &window);
        if score > best.score {
            best = Alignment {
                score,
                indices: window.clone(),
            };
        }
    }

    Some(best)
}

/// Index of the char that completes the leftmost subsequence match.
fn forward_end(pattern: &[char], text: &[char]) -> Option<usize> {
    let mut next = 0;
    for (idx, &ch) in text.iter().enumerate() {
        if ch == pattern[next] {
            next += 1;
            if next == pattern.len() {
                return Some(idx);
            }
        }
    }
    None
}

/// Walks back from `end` to find the shortest window that still matches.
fn backward_positions(pattern: &[char], text: &[char], end: usize) -> Vec<usize> {
    let mut positions = vec![0; pattern.len()];
    let mut remaining = pattern.len();
    for idx in (0..=end).rev() {
        if text[idx] == pattern[remaining - 1] {
            remaining -= 1;
            positions[remaining] = idx;
            if remaining == 0 {
                break;
            }
        }
    }
    positions
}

/// Char offsets of non-overlapping occurrences of `needle` in `hay`.
fn contiguous_starts(hay: &str, needle: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut chars_before = 0;
    let mut byte_cursor = 0;
    for (byte, _) in hay.match_indices(needle) {
        chars_before += hay[byte_cursor..byte].chars().count();
        byte_cursor = byte;
        starts.push(chars_before);
    }
    starts
}

fn score_positions(chars: &[char], positions: &[usize]) -> i64 {
    let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
        return 0;
    };

    let mut score = -(first as i64) * PENALTY_LEADING;
    let mut prev: Option<usize> = None;
    for &idx in positions {
        score += SCORE_MATCH;
        let mut bonus = if is_word_start(chars, idx) {
            BONUS_BOUNDARY
        } else {
            0
        };
        match prev {
            None => bonus *= BONUS_FIRST_CHAR_MULTIPLIER,
            Some(p) if idx == p + 1 => score += BONUS_CONSECUTIVE,
            Some(p) => {
                let gap = (idx - p - 1) as i64;
                score -= PENALTY_GAP_START + (gap - 1) * PENALTY_GAP_EXTENSION;
            }
        }
        score += bonus;
        prev = Some(idx);
    }

    let trailing = (chars.len() - 1 - last) as i64;
    score - trailing / TRAILING_DIVISOR
}

fn is_word_start(chars: &[char], idx: usize) -> bool {
    let Some(&prev) = idx.checked_sub(1).and_then(|p| chars.get(p)) else {
        return true;
    };
    let current = chars[idx];
    is_separator(prev)
        || (prev.is_lowercase() && current.is_uppercase())
        || (!prev.is_alphanumeric() && current.is_alphanumeric())
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '/' | '\\' | '_' | '-' | '.' | ':')
}

/// One-to-one case fold so folded and original char indices line up.
pub fn fold_case(ch: char) -> char {
    if ch.is_ascii() {
        return ch.to_ascii_lowercase();
    }
    ch.to_lowercase().next().unwrap_or(ch)
}

fn indices_to_ranges(indices: &[usize]) -> Vec<(usize, usize)> {
    let Some((&head, rest)) = indices.split_first() else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut start = head;
    let mut prev = head;

    for &idx in rest {
        if idx == prev + 1 {
            prev = idx;
            continue;
        }
        ranges.push((start, prev + 1));
        start = idx;
        prev = idx;
    }

    ranges.push((start, prev + 1));
    ranges
}
