//! Cross-catalog artist matching.
//!
//! A source track only carries a title and an artist display string, so a
//! destination search hit is accepted when one of its artists matches that
//! string. Candidates are checked in the order the destination returned them
//! and the first acceptable one wins; there is no scoring across candidates.
//!
//! An artist name matches when, after [`normalize`]:
//! - it equals the source string, or
//! - the source lists several artists (`"A, B"`) and one of them equals it, or
//! - the source is a single artist and at least half of the tokens of the
//!   longer name are shared with the shorter one ([`token_overlap`]).

use unicode_normalization::UnicodeNormalization;

use crate::types::{CandidateTrack, MatchResult, MatchedTrack};

/// Minimum token overlap, in percent, for a fuzzy artist match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 50.0;

const COMBINING_DIACRITICS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Lowercases, decomposes (NFD) and drops combining diacritical marks, so
/// `"Beyoncé"` and `"beyonce"` compare equal.
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c))
        .collect()
}

/// Percentage of the shorter name's tokens found in the longer name, relative
/// to the longer name's token count. On equal token counts `source` counts as
/// the longer side. Both inputs are expected to be normalized.
pub fn token_overlap(source: &str, candidate: &str) -> f64 {
    let source_tokens: Vec<&str> = source.split_whitespace().collect();
    let candidate_tokens: Vec<&str> = candidate.split_whitespace().collect();

    let (longer, shorter) = if candidate_tokens.len() > source_tokens.len() {
        (candidate_tokens, source_tokens)
    } else {
        (source_tokens, candidate_tokens)
    };

    if longer.is_empty() {
        return 0.0;
    }

    let shared = shorter.iter().filter(|t| longer.contains(t)).count();
    (shared as f64 / longer.len() as f64) * 100.0
}

/// Returns the first candidate that has an artist matching `source_artist`.
pub fn find_best_match(source_artist: &str, candidates: &[CandidateTrack]) -> MatchResult {
    let source = SourceArtist::new(source_artist);

    for candidate in candidates {
        let matched = candidate
            .artists
            .iter()
            .find(|artist| source.matches(artist));

        if let Some(artist) = matched {
            return MatchResult::Matched(MatchedTrack {
                artist: artist.clone(),
                name: candidate.name.clone(),
                uri: candidate.uri.clone(),
            });
        }
    }

    MatchResult::NoMatch
}

/// Source artist string normalized once per search.
struct SourceArtist {
    full: String,
    parts: Option<Vec<String>>,
}

impl SourceArtist {
    fn new(raw: &str) -> Self {
        let parts = raw.contains(',').then(|| {
            raw.split(',')
                .map(|part| normalize(part.trim()))
                .filter(|part| !part.is_empty())
                .collect()
        });

        Self {
            full: normalize(raw),
            parts,
        }
    }

    fn matches(&self, candidate_artist: &str) -> bool {
        let candidate = normalize(candidate_artist);

        if candidate == self.full {
            return true;
        }

        match &self.parts {
            Some(parts) => parts.iter().any(|part| *part == candidate),
            None => token_overlap(&self.full, &candidate) >= FUZZY_MATCH_THRESHOLD,
        }
    }
}
