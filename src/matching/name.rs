// src/matching/name.rs - Token-shape name classifier (EXACT / PARTIAL / NONE)
use strsim::levenshtein;

use crate::matching::normalize::normalize;
use crate::models::MatchType;
use crate::utils::batch_config::MatchingConfig;
use crate::utils::constants::{
    MAX_PARTIAL_CONFIDENCE, MIN_RELATED_TOKEN_LEN, NICKNAME_TOKEN_SCORE, SURNAME_EDIT_PENALTY,
};

/// Verdict for one (query, candidate) name pair, before the candidate record is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub match_type: MatchType,
    pub confidence: f64,
    pub reasoning: String,
}

impl NameMatch {
    fn none(reasoning: impl Into<String>) -> Self {
        Self {
            match_type: MatchType::NoMatch,
            confidence: 0.0,
            reasoning: reasoning.into(),
        }
    }
}

/// How two differing tokens are related, with a score in (0, 1].
struct TokenRelation {
    score: f64,
    description: String,
}

/// Pure classifier. Holds only immutable configuration, so it can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct NameMatchClassifier {
    config: MatchingConfig,
}

impl NameMatchClassifier {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Classifies `candidate_name` against `query_name`.
    ///
    /// Leading titles and trailing allow-listed suffixes are split off both names
    /// first. EXACT means the remaining tokens are identical. PARTIAL allows one
    /// related token: either the first (given) name via nickname/truncation/edit
    /// distance, or the last (surname) within a bounded edit distance. Anything
    /// else is NONE.
    pub fn classify(&self, query_name: &str, candidate_name: &str) -> NameMatch {
        let (query, query_suffixes) = self.split_suffixes(self.strip_titles(normalize(query_name)));
        let (candidate, candidate_suffixes) =
            self.split_suffixes(self.strip_titles(normalize(candidate_name)));

        if query.is_empty() || candidate.is_empty() {
            return NameMatch::none("Empty name after normalization");
        }

        if candidate == query {
            return self.exact(&query_suffixes, &candidate_suffixes);
        }

        if let Some(partial) = self.given_name_variant(&query, &candidate) {
            return partial;
        }
        if let Some(partial) = self.surname_variant(&query, &candidate) {
            return partial;
        }

        NameMatch::none(self.explain_mismatch(&query, &candidate))
    }

    fn strip_titles(&self, tokens: Vec<String>) -> Vec<String> {
        let leading = tokens
            .iter()
            .take_while(|t| self.config.is_title(t))
            .count();
        if leading == tokens.len() {
            // A bare title is still a name.
            tokens
        } else {
            tokens[leading..].to_vec()
        }
    }

    /// Splits trailing allow-listed suffixes off the core name tokens.
    fn split_suffixes(&self, mut tokens: Vec<String>) -> (Vec<String>, Vec<String>) {
        let core_len = tokens
            .iter()
            .rposition(|t| !self.config.is_suffix(t))
            .map_or(0, |i| i + 1);
        if core_len == 0 {
            // Same for a bare suffix.
            return (tokens, Vec::new());
        }
        let suffixes = tokens.split_off(core_len);
        (tokens, suffixes)
    }

    fn exact(&self, query_suffixes: &[String], candidate_suffixes: &[String]) -> NameMatch {
        let reasoning = match (query_suffixes.is_empty(), candidate_suffixes.is_empty()) {
            (true, true) => "Exact match".to_string(),
            (true, false) => format!("Exact match with suffix {}", candidate_suffixes.join(" ")),
            (false, true) => format!(
                "Exact match ignoring query suffix {}",
                query_suffixes.join(" ")
            ),
            (false, false) if query_suffixes == candidate_suffixes => {
                format!("Exact match with suffix {}", candidate_suffixes.join(" "))
            }
            (false, false) => format!(
                "Exact match; suffix {} differs from query suffix {}",
                candidate_suffixes.join(" "),
                query_suffixes.join(" ")
            ),
        };
        NameMatch {
            match_type: MatchType::Exact,
            confidence: 1.0,
            reasoning,
        }
    }

    fn given_name_variant(&self, query: &[String], candidate: &[String]) -> Option<NameMatch> {
        if query.len() < 2 || candidate.len() != query.len() {
            return None;
        }
        if query[0] == candidate[0] || candidate[1..] != query[1..] {
            return None;
        }

        let relation = self.given_name_relation(&candidate[0], &query[0])?;
        Some(self.partial(
            query.len(),
            relation.score,
            1.0,
            format!("Partial match: given name {}", relation.description),
        ))
    }

    fn surname_variant(&self, query: &[String], candidate: &[String]) -> Option<NameMatch> {
        if query.len() < 2 || candidate.len() != query.len() {
            return None;
        }
        let last = query.len() - 1;
        if candidate[..last] != query[..last] || candidate[last] == query[last] {
            return None;
        }

        let relation =
            edit_relation(&candidate[last], &query[last], self.config.surname_max_edits)?;
        Some(self.partial(
            query.len(),
            relation.score,
            SURNAME_EDIT_PENALTY,
            format!("Partial match: surname {}", relation.description),
        ))
    }

    fn given_name_relation(&self, found: &str, wanted: &str) -> Option<TokenRelation> {
        if self.config.nicknames.are_variants(found, wanted) {
            return Some(TokenRelation {
                score: NICKNAME_TOKEN_SCORE,
                description: format!("'{}' is a known variant of '{}'", found, wanted),
            });
        }
        if let Some(relation) = truncation_relation(found, wanted) {
            return Some(relation);
        }
        edit_relation(found, wanted, self.config.given_name_max_edits)
    }

    /// Every token but the related one is aligned; its score stands in for a full token.
    fn partial(
        &self,
        token_count: usize,
        token_score: f64,
        penalty: f64,
        reasoning: String,
    ) -> NameMatch {
        let aligned = (token_count - 1) as f64;
        let confidence = ((aligned + token_score) / token_count as f64 * penalty)
            .min(MAX_PARTIAL_CONFIDENCE);
        NameMatch {
            match_type: MatchType::Partial,
            confidence,
            reasoning,
        }
    }

    fn explain_mismatch(&self, query: &[String], candidate: &[String]) -> String {
        if is_subsequence(query, candidate) {
            let mut extras = candidate.to_vec();
            for token in query {
                if let Some(pos) = extras.iter().position(|t| t == token) {
                    extras.remove(pos);
                }
            }
            return format!("Candidate adds non-suffix token(s): {}", extras.join(" "));
        }
        if candidate.len() < query.len() {
            return "Candidate name is missing query tokens".to_string();
        }
        let last = query.len() - 1;
        if candidate[last] != query[last] {
            format!("Surname '{}' does not match '{}'", candidate[last], query[last])
        } else {
            format!("Given name '{}' is unrelated to '{}'", candidate[0], query[0])
        }
    }
}

fn truncation_relation(a: &str, b: &str) -> Option<TokenRelation> {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    let (short, long, short_len, long_len) = if a_len <= b_len {
        (a, b, a_len, b_len)
    } else {
        (b, a, b_len, a_len)
    };
    if short_len < MIN_RELATED_TOKEN_LEN || !long.starts_with(short) {
        return None;
    }
    Some(TokenRelation {
        score: short_len as f64 / long_len as f64,
        description: format!("'{}' is a truncation of '{}'", short, long),
    })
}

fn edit_relation(found: &str, wanted: &str, max_edits: usize) -> Option<TokenRelation> {
    let found_len = found.chars().count();
    let wanted_len = wanted.chars().count();
    if max_edits == 0 || found_len.min(wanted_len) < MIN_RELATED_TOKEN_LEN {
        return None;
    }
    let edits = levenshtein(found, wanted);
    if edits == 0 || edits > max_edits {
        return None;
    }
    Some(TokenRelation {
        score: 1.0 - edits as f64 / found_len.max(wanted_len) as f64,
        description: format!("'{}' is {} edit(s) from '{}'", found, edits, wanted),
    })
}

fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|n| rest.any(|h| h == n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> NameMatchClassifier {
        NameMatchClassifier::default()
    }

    fn assert_partial(result: &NameMatch) {
        assert_eq!(result.match_type, MatchType::Partial, "{:?}", result);
        assert!(result.confidence > 0.0 && result.confidence < 1.0);
    }

    #[test]
    fn test_identical_tokens_are_exact() {
        let c = classifier();
        for (q, cand) in [
            ("Anthony Bek", "ANTHONY BEK"),
            ("anthony  bek", "Anthony Bek"),
            ("Mary-Jane O'Neil", "MARY-JANE ONEIL"),
            ("Ghafoor Jaggi Nadery", "GHAFOOR JAGGI NADERY"),
        ] {
            let result = c.classify(q, cand);
            assert_eq!(result.match_type, MatchType::Exact, "{} vs {}", q, cand);
            assert_eq!(result.confidence, 1.0);
        }
    }

    #[test]
    fn test_trailing_suffix_keeps_exact() {
        let result = classifier().classify("John Smith", "JOHN SMITH JR.");
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.reasoning, "Exact match with suffix JR");

        let result = classifier().classify("John Smith", "JOHN SMITH III");
        assert_eq!(result.match_type, MatchType::Exact);
    }

    #[test]
    fn test_inserted_middle_name_is_none() {
        let result = classifier().classify("John Smith", "John Michael Smith");
        assert_eq!(result.match_type, MatchType::NoMatch);
        assert_eq!(result.confidence, 0.0);
        assert!(result.reasoning.contains("MICHAEL"));
    }

    #[test]
    fn test_query_suffix_is_ignored() {
        let c = classifier();
        let result = c.classify("John Smith Jr", "JOHN SMITH");
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.reasoning, "Exact match ignoring query suffix JR");

        let result = c.classify("John Smith Jr", "JOHN SMITH JR");
        assert_eq!(result.reasoning, "Exact match with suffix JR");
    }

    #[test]
    fn test_differing_suffixes_stay_exact() {
        let result = classifier().classify("John Smith Jr", "JOHN SMITH SR");
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.reasoning, "Exact match; suffix SR differs from query suffix JR");
    }

    #[test]
    fn test_query_suffix_does_not_shift_partial_rules() {
        let c = classifier();
        assert_partial(&c.classify("Michael Smith Jr", "MIKE SMITH"));
        let result = c.classify("Ghafoor Nadery III", "GHAFOOR NADER");
        assert_partial(&result);
        assert!(result.reasoning.contains("NADERY"));
    }

    #[test]
    fn test_trailing_non_suffix_token_is_none() {
        let result = classifier().classify("John Smith", "JOHN SMITH WILLIAMS");
        assert_eq!(result.match_type, MatchType::NoMatch);
    }

    #[test]
    fn test_different_surname_is_none() {
        let c = classifier();
        assert_eq!(c.classify("Anthony Bek", "Anthony Bakhos").match_type, MatchType::NoMatch);
        assert_eq!(c.classify("Tony Bek", "ANTHONY BAKHOS").match_type, MatchType::NoMatch);
        assert_eq!(c.classify("Anthony Bek", "ANTHONY BEKARIAN").match_type, MatchType::NoMatch);
    }

    #[test]
    fn test_nickname_given_name_is_partial() {
        let c = classifier();
        let result = c.classify("Michael Smith", "MIKE SMITH");
        assert_partial(&result);
        assert!(result.reasoning.contains("known variant"));

        let result = c.classify("Tony Bek", "ANTHONY BEK");
        assert_partial(&result);
    }

    #[test]
    fn test_truncated_given_name_is_partial() {
        let result = classifier().classify("Maximilian Jones", "MAX JONES");
        assert_partial(&result);
        assert!(result.reasoning.contains("truncation"));
    }

    #[test]
    fn test_short_truncation_is_not_related() {
        let result = classifier().classify("Al Jones", "ALBERTO JONES");
        assert_eq!(result.match_type, MatchType::NoMatch);
    }

    #[test]
    fn test_surname_single_edit_is_partial() {
        let c = classifier();
        let result = c.classify("Ghafoor Nadery", "GHAFOOR NADER");
        assert_partial(&result);
        assert!(result.reasoning.contains("surname"));

        let result = c.classify("John Brown", "JOHN BROWNE");
        assert_partial(&result);
    }

    #[test]
    fn test_surname_edit_scores_below_nickname() {
        let c = classifier();
        let nickname = c.classify("Michael Smith", "MIKE SMITH");
        let surname = c.classify("John Brown", "JOHN BROWNE");
        assert!(surname.confidence < nickname.confidence);
    }

    #[test]
    fn test_two_differences_is_none() {
        let result = classifier().classify("Michael Smith", "MIKE SMYTH");
        assert_eq!(result.match_type, MatchType::NoMatch);
    }

    #[test]
    fn test_titles_are_ignored() {
        let result = classifier().classify("Dr John Smith", "JOHN SMITH");
        assert_eq!(result.match_type, MatchType::Exact);
        let result = classifier().classify("John Smith", "MR JOHN SMITH SR");
        assert_eq!(result.match_type, MatchType::Exact);
    }

    #[test]
    fn test_empty_and_garbage_input_is_none() {
        let c = classifier();
        assert_eq!(c.classify("", "JOHN SMITH").match_type, MatchType::NoMatch);
        assert_eq!(c.classify("John Smith", "   ").match_type, MatchType::NoMatch);
        assert_eq!(c.classify("...", "!!!").match_type, MatchType::NoMatch);
    }

    #[test]
    fn test_shorter_candidate_is_none() {
        let result = classifier().classify("John Michael Smith", "JOHN SMITH");
        assert_eq!(result.match_type, MatchType::NoMatch);
    }

    #[test]
    fn test_classify_is_pure() {
        let c = classifier();
        let first = c.classify("Michael Smith", "MIKE SMITH");
        for _ in 0..5 {
            assert_eq!(c.classify("Michael Smith", "MIKE SMITH"), first);
        }
    }

    #[test]
    fn test_custom_suffix_list() {
        let mut config = MatchingConfig::default();
        config.suffixes.clear();
        config.suffixes.insert("OAM".to_string());
        let c = NameMatchClassifier::new(config);
        assert_eq!(c.classify("Jane Doe", "JANE DOE OAM").match_type, MatchType::Exact);
        assert_eq!(c.classify("Jane Doe", "JANE DOE JR").match_type, MatchType::NoMatch);
    }
}
