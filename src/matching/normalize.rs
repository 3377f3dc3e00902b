// src/matching/normalize.rs - Canonical token form for person names

/// Characters that separate words even when no whitespace surrounds them.
const WORD_SEPARATORS: [char; 7] = [',', '/', ';', '&', '(', ')', '_'];

/// Uppercases, strips punctuation (hyphens survive only inside a token),
/// collapses whitespace and splits into tokens. Never fails.
pub fn normalize(raw: &str) -> Vec<String> {
    let spaced: String = raw
        .chars()
        .map(|c| if WORD_SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();

    spaced.split_whitespace().filter_map(normalize_token).collect()
}

/// Token sequence joined back with single spaces, e.g. for lookup keys.
pub fn normalize_name(raw: &str) -> String {
    normalize(raw).join(" ")
}

fn normalize_token(word: &str) -> Option<String> {
    let kept: String = word
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .flat_map(char::to_uppercase)
        .collect();

    let token = kept
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercases_and_collapses_whitespace() {
        assert_eq!(normalize("  anthony \t  bek "), vec!["ANTHONY", "BEK"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n ").is_empty());
        assert!(normalize(" - . ' ").is_empty());
    }

    #[test]
    fn test_punctuation_and_inner_hyphens() {
        assert_eq!(normalize("O'Brien-Smith, Mary."), vec!["OBRIEN-SMITH", "MARY"]);
        assert_eq!(normalize("-Jean- Luc"), vec!["JEAN", "LUC"]);
        assert_eq!(normalize("Anne--Marie"), vec!["ANNE-MARIE"]);
        assert_eq!(normalize("John Smith Jr."), vec!["JOHN", "SMITH", "JR"]);
    }

    #[test]
    fn test_separators_split_words() {
        assert_eq!(normalize("SMITH,JOHN"), vec!["SMITH", "JOHN"]);
        assert_eq!(normalize_name("bek/anthony"), "BEK ANTHONY");
    }

    #[test]
    fn test_non_ascii_letters_survive() {
        assert_eq!(normalize("José Núñez"), vec!["JOSÉ", "NÚÑEZ"]);
    }
}
