pub mod fuzzy;
pub mod rank;

pub use fuzzy::{FuzzyMatch, MatchScore, fold_case, fuzzy_match, match_positions};
pub use rank::{RankedMatch, rank_by, rank_limited, rank_parallel, ranked_matches};
