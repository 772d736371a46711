//! Rule-based part-of-speech tagging
//!
//! Three passes over a sentence-marked token sequence:
//! 1. every token gets its candidate tags (lexicon, inflection back-off, shape, suffix),
//! 2. tokens with more than one candidate are resolved against their neighbours,
//! 3. -ed/-ing verbs sitting between a modifier slot and a noun become adjectives.
use crate::lang::lemmatizer::{singulars, verb_lemma};
use crate::lang::lexicon::Lexicon;
use crate::lang::pos::Pos;

#[derive(Debug, Clone)]
struct Guess {
    tags: Vec<Pos>,
    /// Came from suffix or inflection rules rather than a lexicon entry
    derived: bool,
}

impl Guess {
    fn known(tags: Vec<Pos>) -> Self {
        Guess { tags, derived: false }
    }
    fn derived(pos: Pos) -> Self {
        Guess { tags: vec![pos], derived: true }
    }
    fn can(&self, pos: Pos) -> bool {
        self.tags.contains(&pos)
    }
}

const SYMBOLS: &str = "$%&+=<>#@*/\\^|~§°€£¥";

const SUFFIXES: &[(&str, Pos)] = &[
    ("ly", Pos::Adv),
    ("ness", Pos::Noun), ("ment", Pos::Noun), ("tion", Pos::Noun), ("sion", Pos::Noun),
    ("ity", Pos::Noun), ("ship", Pos::Noun), ("ism", Pos::Noun), ("ist", Pos::Noun),
    ("ance", Pos::Noun), ("ence", Pos::Noun), ("hood", Pos::Noun),
    ("ous", Pos::Adj), ("ful", Pos::Adj), ("ive", Pos::Adj), ("able", Pos::Adj),
    ("ible", Pos::Adj), ("less", Pos::Adj), ("ish", Pos::Adj), ("ical", Pos::Adj),
    ("ial", Pos::Adj), ("al", Pos::Adj), ("ic", Pos::Adj), ("ary", Pos::Adj),
    ("ize", Pos::Verb), ("ise", Pos::Verb), ("ify", Pos::Verb),
    ("ing", Pos::Verb), ("ed", Pos::Verb),
    ("ers", Pos::Noun), ("er", Pos::Noun), ("ors", Pos::Noun), ("or", Pos::Noun),
    ("s", Pos::Noun),
];

fn is_capitalized(text: &str) -> bool {
    text.chars().next().map_or(false, char::is_uppercase)
}

fn suffix_guess(lower: &str) -> Option<Pos> {
    let len = lower.chars().count();
    SUFFIXES.iter()
        .find(|&&(suffix, _)| len >= suffix.len() + 2 && lower.ends_with(suffix))
        .map(|&(_, pos)| pos)
}

/// Map an inflected form onto a lexicon base form
fn backoff(lexicon: &Lexicon, lower: &str) -> Option<Pos> {
    if lower.ends_with('s') {
        for base in singulars(lower) {
            if let Some(entry) = lexicon.get(&base) {
                if let Some(&pos) = entry.tags.iter().find(|&&p| p == Pos::Noun || p == Pos::Verb) {
                    return Some(pos);
                }
            }
        }
    }
    if lower.ends_with("ed") || lower.ends_with("ing") {
        if let Some(base) = verb_lemma(lexicon, lower) {
            if lexicon.allows(&base, Pos::Verb) {
                return Some(Pos::Verb);
            }
        }
    }
    None
}

fn first_guess(lexicon: &Lexicon, text: &str, sent_start: bool) -> Guess {
    if !text.chars().any(char::is_alphanumeric) {
        let symbol = text.chars().all(|c| SYMBOLS.contains(c));
        return Guess::known(vec![if symbol { Pos::Sym } else { Pos::Punct }]);
    }
    if text.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        let lower = text.to_lowercase();
        let ordinal = ["st", "nd", "rd", "th"].iter().any(|s| lower.ends_with(s));
        return Guess::known(vec![if ordinal { Pos::Adj } else { Pos::Num }]);
    }
    let lower = text.to_lowercase();
    let mid_sentence_caps = is_capitalized(text) && !sent_start;
    if let Some(entry) = lexicon.get(&lower) {
        if mid_sentence_caps && entry.tags == [Pos::Noun] {
            return Guess::known(vec![Pos::Propn]);
        }
        return Guess::known(entry.tags.clone());
    }
    let all_caps = text.chars().count() > 1 && text.chars().all(|c| !c.is_lowercase());
    if mid_sentence_caps || all_caps {
        return Guess::derived(Pos::Propn);
    }
    if let Some(pos) = backoff(lexicon, &lower) {
        return Guess::derived(pos);
    }
    match suffix_guess(&lower) {
        Some(pos) => Guess::derived(pos),
        None if sent_start && is_capitalized(text) => Guess::derived(Pos::Propn),
        None => Guess::derived(Pos::Noun),
    }
}

fn is_nounish(pos: Option<Pos>) -> bool {
    match pos {
        Some(Pos::Noun) | Some(Pos::Propn) | Some(Pos::Adj) | Some(Pos::Num) => true,
        _ => false,
    }
}

fn resolve(guess: &Guess, prev: Option<Pos>, next: Option<&Guess>, next_tag: Option<Pos>,
    next2_tag: Option<Pos>) -> Pos {
    let next_can_verb = next.map_or(false, |g| g.can(Pos::Verb));
    if guess.can(Pos::Det) && is_nounish(next_tag) {
        return Pos::Det;
    }
    if guess.can(Pos::Aux)
        && (next_tag == Some(Pos::Verb)
            || (matches!(next_tag, Some(Pos::Adv) | Some(Pos::Part)) && next2_tag == Some(Pos::Verb))) {
        return Pos::Aux;
    }
    if guess.can(Pos::Part) && next_can_verb && next_tag != Some(Pos::Det) {
        return Pos::Part;
    }
    if guess.can(Pos::Verb) && matches!(prev, Some(Pos::Pron) | Some(Pos::Aux) | Some(Pos::Part)) {
        return Pos::Verb;
    }
    if guess.can(Pos::Noun)
        && matches!(prev, Some(Pos::Det) | Some(Pos::Adj) | Some(Pos::Num) | Some(Pos::Adp)) {
        return Pos::Noun;
    }
    guess.tags[0]
}

/// Tag one document's tokens. `sent_starts` marks the first token of every sentence.
pub fn tag(lexicon: &Lexicon, texts: &[&str], sent_starts: &[bool]) -> Vec<Pos> {
    let guesses: Vec<Guess> = texts.iter()
        .zip(sent_starts)
        .map(|(text, &start)| first_guess(lexicon, text, start))
        .collect();
    let mut tags: Vec<Pos> = guesses.iter().map(|g| g.tags[0]).collect();

    for i in 0..guesses.len() {
        if guesses[i].tags.len() > 1 {
            let prev = if i > 0 && !sent_starts[i] { Some(tags[i - 1]) } else { None };
            tags[i] = resolve(&guesses[i], prev, guesses.get(i + 1), tags.get(i + 1).cloned(),
                tags.get(i + 2).cloned());
        }
    }

    for i in 1..guesses.len().saturating_sub(1) {
        let lower = texts[i].to_lowercase();
        let participle = lower.ends_with("ed") || lower.ends_with("ing");
        if tags[i] == Pos::Verb && guesses[i].derived && participle && !sent_starts[i]
            && matches!(tags[i - 1], Pos::Det | Pos::Adj | Pos::Adp | Pos::Cconj | Pos::Punct)
            && matches!(tags[i + 1], Pos::Noun | Pos::Propn) {
            tags[i] = Pos::Adj;
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::parse(
            "the\tDET\nto\tADP|PART\nwork\tNOUN|VERB\nworker\tNOUN\nwe\tPRON\tI\nmust\tAUX\n\
             american\tADJ\nfor\tADP\nsenate\tNOUN\nthat\tSCONJ|DET|PRON\nhelp\tNOUN|VERB\nhave\tAUX|VERB\n",
            "the\nto\n",
        )
        .unwrap()
    }

    fn tags_of(words: &[&str]) -> Vec<Pos> {
        let mut starts = vec![false; words.len()];
        starts[0] = true;
        tag(&lexicon(), words, &starts)
    }

    #[test]
    fn infinitive_to_and_verbs() {
        assert_eq!(tags_of(&["we", "want", "to", "work"]),
            vec![Pos::Pron, Pos::Noun, Pos::Part, Pos::Verb]);
    }

    #[test]
    fn nouns_after_determiners() {
        assert_eq!(tags_of(&["the", "work", "of", "American", "workers"]),
            vec![Pos::Det, Pos::Noun, Pos::Noun, Pos::Adj, Pos::Noun]);
    }

    #[test]
    fn capitalized_words_mid_sentence_are_proper_nouns() {
        assert_eq!(tags_of(&["for", "Vermont", "and", "the", "Senate"])[1], Pos::Propn);
        assert_eq!(tags_of(&["for", "Vermont", "and", "the", "Senate"])[4], Pos::Propn);
    }

    #[test]
    fn participles_before_nouns_are_adjectives() {
        assert_eq!(tags_of(&["for", "displaced", "workers"]), vec![Pos::Adp, Pos::Adj, Pos::Noun]);
        assert_eq!(tags_of(&["we", "have", "worked", "hard"])[1..3].to_vec(), vec![Pos::Aux, Pos::Verb]);
    }

    #[test]
    fn determiner_that() {
        assert_eq!(tags_of(&["that", "worker"])[0], Pos::Det);
        assert_eq!(tags_of(&["help", "that", "we", "must"])[1], Pos::Sconj);
    }

    #[test]
    fn numbers_symbols_and_punctuation() {
        assert_eq!(tags_of(&["$", "7.25", ",", "21st"]), vec![Pos::Sym, Pos::Num, Pos::Punct, Pos::Adj]);
    }
}
