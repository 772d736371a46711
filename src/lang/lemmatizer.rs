//! Dictionary-first lemmatization with suffix rules for everything the lexicon misses
use crate::lang::lexicon::Lexicon;
use crate::lang::pos::Pos;

pub fn lemmatize(lexicon: &Lexicon, text: &str, lower: &str, pos: Pos) -> String {
    if let Some(entry) = lexicon.get(lower) {
        if let Some(ref lemma) = entry.lemma {
            if entry.has(pos) || pos == Pos::Propn {
                return lemma.clone();
            }
        }
    }
    match pos {
        Pos::Propn => text.to_string(),
        Pos::Noun => noun_lemma(lexicon, lower),
        Pos::Verb | Pos::Aux => verb_lemma(lexicon, lower).unwrap_or_else(|| lower.to_string()),
        Pos::Adj => adjective_lemma(lexicon, lower),
        _ => lower.to_string(),
    }
}

/// Candidate singulars, most specific rule first
pub(crate) fn singulars(lower: &str) -> Vec<String> {
    let mut out = vec![];
    if lower.len() > 4 && lower.ends_with("ies") {
        out.push(format!("{}y", &lower[..lower.len() - 3]));
    }
    for suffix in &["sses", "shes", "ches", "xes", "zzes"] {
        if lower.ends_with(suffix) {
            out.push(lower[..lower.len() - 2].to_string());
        }
    }
    if lower.len() > 3 && lower.ends_with('s')
        && !lower.ends_with("ss") && !lower.ends_with("us") && !lower.ends_with("is") {
        out.push(lower[..lower.len() - 1].to_string());
    }
    out
}

fn noun_lemma(lexicon: &Lexicon, lower: &str) -> String {
    if lexicon.allows(lower, Pos::Noun) {
        return lower.to_string();
    }
    let candidates = singulars(lower);
    candidates.iter()
        .find(|c| lexicon.get(c).is_some())
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| lower.to_string())
}

/// Undo -s, -ed and -ing. `None` if the word has none of those endings.
pub(crate) fn verb_lemma(lexicon: &Lexicon, lower: &str) -> Option<String> {
    if lower.len() > 4 && (lower.ends_with("ies") || lower.ends_with("ied")) {
        return Some(format!("{}y", &lower[..lower.len() - 3]));
    }
    if lower.len() > 4 && lower.ends_with("ing") {
        return Some(repair_stem(lexicon, &lower[..lower.len() - 3]));
    }
    if lower.len() > 3 && lower.ends_with("ed") {
        return Some(repair_stem(lexicon, &lower[..lower.len() - 2]));
    }
    if lower.ends_with('s') {
        return singulars(lower).into_iter().next();
    }
    None
}

fn adjective_lemma(lexicon: &Lexicon, lower: &str) -> String {
    for suffix in &["est", "er"] {
        if lower.len() > suffix.len() + 2 && lower.ends_with(suffix) {
            let stem = &lower[..lower.len() - suffix.len()];
            for candidate in stem_variants(stem) {
                if lexicon.allows(&candidate, Pos::Adj) {
                    return candidate;
                }
            }
        }
    }
    lower.to_string()
}

fn stem_variants(stem: &str) -> Vec<String> {
    let mut out = vec![stem.to_string(), format!("{}e", stem)];
    if ends_with_double_consonant(stem) {
        out.push(drop_last(stem));
    }
    if stem.ends_with('i') {
        out.push(format!("{}y", &stem[..stem.len() - 1]));
    }
    out
}

/// Turn what is left after removing -ed/-ing back into a word: check the lexicon first, then
/// apply the Porter step 1b fixes.
fn repair_stem(lexicon: &Lexicon, stem: &str) -> String {
    for candidate in stem_variants(stem) {
        if lexicon.allows(&candidate, Pos::Verb) || lexicon.allows(&candidate, Pos::Aux) {
            return candidate;
        }
    }
    if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
        return format!("{}e", stem);
    }
    if ends_with_double_consonant(stem) && !stem.ends_with('l') && !stem.ends_with('s')
        && !stem.ends_with('z') {
        return drop_last(stem);
    }
    if measure(stem) == 1 && ends_cvc(stem) {
        return format!("{}e", stem);
    }
    stem.to_string()
}

fn drop_last(word: &str) -> String {
    let mut out = word.to_string();
    out.pop();
    out
}

fn is_consonant(chars: &[char], i: usize) -> bool {
    match chars[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(chars, i - 1),
        _ => true,
    }
}

fn ends_with_double_consonant(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    n >= 2 && chars[n - 1] == chars[n - 2] && is_consonant(&chars, n - 1)
}

/// Porter's m: the number of vowel-consonant sequences
fn measure(word: &str) -> usize {
    let chars: Vec<char> = word.chars().collect();
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..chars.len() {
        let consonant = is_consonant(&chars, i);
        if consonant && prev_vowel {
            m += 1;
        }
        prev_vowel = !consonant;
    }
    m
}

fn ends_cvc(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    n >= 3
        && is_consonant(&chars, n - 3)
        && !is_consonant(&chars, n - 2)
        && is_consonant(&chars, n - 1)
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
}
