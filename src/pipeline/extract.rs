//! Entity extraction: tag a headline into people, places, objects, and
//! general fallback terms.
//!
//! The tagger is lexicon-driven (see [`crate::lexicon`]): headlines are short,
//! title-cased, and dominated by a small vocabulary of verbs, honorifics, and
//! place names, so a closed-class lookup plus capitalisation cues recovers
//! the entities that matter for photo search without a statistical model.
//!
//! ## Passes
//!
//! 1. Tokenise, remembering where punctuation separates clauses.
//! 2. Walk capitalised runs: longest gazetteer match → location; person
//!    title or given name followed by name words → person.
//! 3. Nouns: remaining open-class words (not verbs, modifiers, numbers).
//! 4. Capitalised terms: every capitalised word outside a person or place
//!    span, catching proper nouns the noun pass dismissed.
//! 5. General terms: every word that is not an article, preposition, or
//!    conjunction, longer than three characters.

use crate::lexicon;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// At most this many people are reported.
pub const MAX_PEOPLE: usize = 2;
/// At most this many locations are reported.
pub const MAX_LOCATIONS: usize = 2;
/// At most this many objects are reported.
pub const MAX_OBJECTS: usize = 5;
/// At most this many general terms are reported.
pub const MAX_GENERAL: usize = 5;

/// Objects must be longer than this many characters.
const OBJECT_MIN_EXCLUSIVE: usize = 2;
/// General terms must be longer than this many characters.
const GENERAL_MIN_EXCLUSIVE: usize = 3;
/// Words allowed after a person title or given name.
const MAX_NAME_WORDS: usize = 3;

/// Terms extracted from one title, grouped by category.
///
/// Order inside each list is extraction order. `objects` and `general` never
/// repeat a string already listed in `people` or `locations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTerms {
    pub people: Vec<String>,
    pub locations: Vec<String>,
    pub objects: Vec<String>,
    pub general: Vec<String>,
}

impl CategorizedTerms {
    /// True when no category holds a term.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
            && self.locations.is_empty()
            && self.objects.is_empty()
            && self.general.is_empty()
    }

    fn is_entity(&self, term: &str) -> bool {
        self.people.iter().any(|p| p == term) || self.locations.iter().any(|l| l == term)
    }
}

/// Turns a title into [`CategorizedTerms`].
///
/// The generator holds an `Arc<dyn EntityExtractor>` so callers can plug in
/// a stronger tagger (or a fixed one in tests).
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, title: &str) -> CategorizedTerms;
}

/// The built-in lexicon tagger.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl EntityExtractor for HeuristicExtractor {
    fn extract(&self, title: &str) -> CategorizedTerms {
        extract(title)
    }
}

#[derive(Debug)]
struct Token {
    text: String,
    /// Punctuation (not just whitespace) separates this token from the previous one.
    break_before: bool,
}

impl Token {
    fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’.\-&][\p{L}\p{N}]+)*").unwrap());

fn tokenize(title: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last_end = 0;
    for m in RE_WORD.find_iter(title) {
        let gap = &title[last_end..m.start()];
        let break_before = !tokens.is_empty() && gap.chars().any(|c| !c.is_whitespace());
        last_end = m.end();

        let text = strip_possessive(m.as_str());
        if text.is_empty() {
            continue;
        }
        tokens.push(Token {
            text: text.to_string(),
            break_before,
        });
    }
    tokens
}

fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("’s"))
        .unwrap_or(word)
}

/// Words that can continue a capitalised name ("Joe" "Biden").
fn is_name_word(tok: &Token) -> bool {
    tok.is_capitalized()
        && !lexicon::is_stop_word(&tok.text)
        && !lexicon::is_known_verb(&tok.text)
        && !lexicon::is_modifier(&tok.text)
}

fn looks_like_verb_or_adverb(word: &str) -> bool {
    let w = word.to_lowercase();
    w.chars().count() > 4 && (w.ends_with("ing") || w.ends_with("ed") || w.ends_with("ly"))
}

fn is_numeric(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

fn is_noun(tok: &Token) -> bool {
    !lexicon::is_stop_word(&tok.text)
        && !lexicon::is_known_verb(&tok.text)
        && !lexicon::is_modifier(&tok.text)
        && !is_numeric(&tok.text)
        && !looks_like_verb_or_adverb(&tok.text)
}

fn push_unique(list: &mut Vec<String>, term: String) {
    if !list.contains(&term) {
        list.push(term);
    }
}

/// Extract categorised terms from a title. Pure; never fails.
pub fn extract(title: &str) -> CategorizedTerms {
    let tokens = tokenize(title);
    let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    let n = tokens.len();

    // ── Entity spans ────────────────────────────────────────────────────
    let mut people = Vec::new();
    let mut locations = Vec::new();
    let mut in_entity = vec![false; n];

    let mut i = 0;
    while i < n {
        if !tokens[i].is_capitalized() {
            i += 1;
            continue;
        }

        // Multi-word matches never cross clause punctuation.
        let clause_end = (i + 1..n).find(|&j| tokens[j].break_before).unwrap_or(n);
        let clause = &words[..clause_end];

        if let Some(len) = lexicon::longest_place_at(clause, i) {
            push_unique(&mut locations, words[i..i + len].join(" "));
            in_entity[i..i + len].fill(true);
            i += len;
            continue;
        }

        let name_start = match lexicon::title_run_at(clause, i) {
            Some(len) => Some((i + len, true)),
            None if lexicon::is_given_name(words[i]) => Some((i + 1, false)),
            None => None,
        };

        if let Some((mut end, titled)) = name_start {
            let limit = end + MAX_NAME_WORDS;
            while end < clause_end
                && end < limit
                && is_name_word(&tokens[end])
                && lexicon::longest_place_at(clause, end).is_none()
            {
                end += 1;
            }
            // A lone given name is too ambiguous ("Bill", "Mark").
            if titled || end > i + 1 {
                push_unique(&mut people, words[i..end].join(" "));
                in_entity[i..end].fill(true);
                i = end;
                continue;
            }
        }

        i += 1;
    }

    let mut terms = CategorizedTerms {
        people,
        locations,
        ..Default::default()
    };

    // ── Objects ─────────────────────────────────────────────────────────
    let candidate = |idx: usize| -> bool {
        !in_entity[idx]
            && tokens[idx].char_len() > OBJECT_MIN_EXCLUSIVE
            && !terms.is_entity(&tokens[idx].text)
    };

    let nouns = (0..n).filter(|&j| candidate(j) && is_noun(&tokens[j]));
    // Any capitalised word counts, verbs and function words included.
    let capitalized = (0..n).filter(|&j| candidate(j) && tokens[j].is_capitalized());

    let mut objects: Vec<String> = Vec::new();
    for j in nouns.chain(capitalized) {
        push_unique(&mut objects, tokens[j].text.clone());
    }
    objects.truncate(MAX_OBJECTS);

    // ── General fallback ────────────────────────────────────────────────
    let mut general: Vec<String> = tokens
        .iter()
        .filter(|t| {
            !lexicon::is_preposition(&t.text)
                && !lexicon::is_conjunction(&t.text)
                && !lexicon::is_article(&t.text)
        })
        .filter(|t| t.char_len() > GENERAL_MIN_EXCLUSIVE)
        .filter(|t| !terms.is_entity(&t.text))
        .map(|t| t.text.clone())
        .collect();
    general.truncate(MAX_GENERAL);

    terms.objects = objects;
    terms.general = general;
    terms.people.truncate(MAX_PEOPLE);
    terms.locations.truncate(MAX_LOCATIONS);

    debug!(
        people = ?terms.people,
        locations = ?terms.locations,
        objects = ?terms.objects,
        general = ?terms.general,
        "Extracted terms"
    );
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_no_cross_duplicates(t: &CategorizedTerms) {
        for term in t.objects.iter().chain(t.general.iter()) {
            assert!(
                !t.people.contains(term) && !t.locations.contains(term),
                "{term:?} duplicated across categories in {t:?}"
            );
        }
    }

    #[test]
    fn empty_title_yields_empty_terms() {
        let t = extract("");
        assert!(t.is_empty());
    }

    #[test]
    fn stop_words_only_yield_empty_terms() {
        let t = extract("the of and, in a");
        assert!(t.is_empty(), "got {t:?}");
    }

    #[test]
    fn punctuation_only_yields_empty_terms() {
        assert!(extract("?! -- ...").is_empty());
    }

    #[test]
    fn detects_titled_person_and_place() {
        let t = extract("Prime Minister Visits New York");
        assert_eq!(t.people, vec!["Prime Minister"]);
        assert_eq!(t.locations, vec!["New York"]);
        // Words inside the person and place spans are never objects.
        assert_eq!(t.objects, vec!["Visits"]);
        assert_eq!(t.general, vec!["Prime", "Minister", "Visits", "York"]);
        assert_no_cross_duplicates(&t);
    }

    #[test]
    fn detects_given_name_person() {
        let t = extract("Elon Musk Buys Struggling Airline in Texas");
        assert_eq!(t.people, vec!["Elon Musk"]);
        assert_eq!(t.locations, vec!["Texas"]);
        assert!(t.objects.contains(&"Airline".to_string()), "got {:?}", t.objects);
        assert_no_cross_duplicates(&t);
    }

    #[test]
    fn title_followed_by_name() {
        let t = extract("President Joe Biden meets leaders in Tokyo");
        assert_eq!(t.people, vec!["President Joe Biden"]);
        assert_eq!(t.locations, vec!["Tokyo"]);
        assert_eq!(t.objects, vec!["leaders"]);
    }

    #[test]
    fn lone_given_name_is_not_a_person() {
        let t = extract("Bill passes in parliament");
        assert!(t.people.is_empty());
        assert!(t.objects.contains(&"Bill".to_string()));
    }

    #[test]
    fn lowercase_nouns_are_objects() {
        let t = extract("earthquake damages temples and houses");
        assert!(t.people.is_empty());
        assert!(t.locations.is_empty());
        assert_eq!(t.objects, vec!["earthquake", "damages", "temples", "houses"]);
    }

    #[test]
    fn capitalized_terms_recover_suffix_dismissed_names() {
        // "Kelly" looks like an adverb to the noun pass.
        let t = extract("Kelly wins award");
        assert!(t.objects.contains(&"award".to_string()));
        assert!(t.objects.contains(&"Kelly".to_string()));
        assert_eq!(t.objects[0], "award", "nouns come before capitalised terms");
    }

    #[test]
    fn capitalized_verb_list_words_are_objects() {
        let t = extract("The Storm Hits Kathmandu Valley");
        assert!(t.objects.contains(&"Storm".to_string()), "got {:?}", t.objects);
        assert!(t.objects.contains(&"The".to_string()), "got {:?}", t.objects);
        assert!(!t.objects.contains(&"Kathmandu".to_string()));

        let lower = extract("storm hits valley");
        assert!(!lower.objects.contains(&"storm".to_string()), "got {:?}", lower.objects);
    }

    #[test]
    fn objects_are_deduplicated_and_truncated() {
        let t = extract("rice wheat rice maize barley millet sorghum oats");
        assert_eq!(t.objects, vec!["rice", "wheat", "maize", "barley", "millet"]);
    }

    #[test]
    fn short_words_are_not_objects() {
        let t = extract("AI ox");
        assert!(t.objects.is_empty(), "got {:?}", t.objects);
    }

    #[test]
    fn general_is_truncated_to_five() {
        let t = extract("alpha bravo charlie delta echoes foxtrot golfing");
        assert_eq!(t.general.len(), MAX_GENERAL);
        assert_eq!(t.general[0], "alpha");
    }

    #[test]
    fn general_skips_function_classes_and_short_words() {
        let t = extract("Floods across the valley and over bridges");
        assert_eq!(t.general, vec!["Floods", "valley", "bridges"]);
    }

    #[test]
    fn people_and_locations_truncated_to_two() {
        let t = extract("Tokyo, Paris, London, Berlin summit");
        assert_eq!(t.locations, vec!["Tokyo", "Paris"]);
        assert_no_cross_duplicates(&t);
    }

    #[test]
    fn possessive_is_stripped() {
        let t = extract("Nepal's tourism rebounds");
        assert_eq!(t.locations, vec!["Nepal"]);
        assert!(t.objects.contains(&"tourism".to_string()));
    }

    #[test]
    fn punctuation_breaks_entity_spans() {
        // "York" after a comma must not fuse with "New".
        let t = extract("Something New, York Minster reopens");
        assert!(!t.locations.contains(&"New York".to_string()), "got {t:?}");
    }

    #[test]
    fn extraction_is_deterministic() {
        let title = "Flood warning issued for Chitwan as monsoon intensifies";
        assert_eq!(extract(title), extract(title));
    }

    #[test]
    fn heuristic_extractor_matches_free_function() {
        let title = "Queen Elizabeth Opens Bridge in London";
        assert_eq!(HeuristicExtractor.extract(title), extract(title));
    }
}
