//! Split text into word, number and punctuation pieces
//!
//! Word boundaries come from Unicode (UAX #29). On top of that, periods are re-attached to known
//! abbreviations ("Mr.", "U.S.") and English clitics are split off ("do" + "n't", "worker" + "'s").
use unicode_segmentation::UnicodeSegmentation;

/// A token before tagging: a slice of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<'t> {
    pub text: &'t str,
    /// Byte offset into the source
    pub idx: usize,
    /// Followed by whitespace
    pub whitespace: bool,
    /// The whitespace before this piece contained a line break
    pub newline_before: bool,
}

impl<'t> Piece<'t> {
    pub fn end(&self) -> usize {
        self.idx + self.text.len()
    }
}

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "jr", "sr", "st", "sen", "rep", "reps", "gov", "gen", "lt", "col",
    "capt", "sgt", "vs", "etc", "inc", "corp", "ltd", "dept", "messrs",
];

const CLITICS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

fn is_abbreviation(word: &str) -> bool {
    // "U.S" is left over from "U.S." once the word boundary rules have run
    (word.contains('.') && word.chars().any(char::is_alphabetic))
        || ABBREVIATIONS.iter().any(|a| a.eq_ignore_ascii_case(word))
}

pub fn tokenize(text: &str) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = vec![];
    let mut newline = false;
    for (idx, seg) in text.split_word_bound_indices() {
        if seg.chars().all(char::is_whitespace) {
            if let Some(last) = pieces.last_mut() {
                last.whitespace = true;
            }
            newline |= seg.contains('\n');
            continue;
        }
        if seg == "." {
            if let Some(last) = pieces.last_mut() {
                if !last.whitespace && last.end() == idx && is_abbreviation(last.text) {
                    last.text = &text[last.idx..idx + 1];
                    continue;
                }
            }
        }
        let (word, clitic) = split_clitic(seg);
        pieces.push(Piece { text: word, idx, whitespace: false, newline_before: newline });
        newline = false;
        if let Some(clitic) = clitic {
            pieces.push(Piece {
                text: clitic,
                idx: idx + word.len(),
                whitespace: false,
                newline_before: false,
            });
        }
    }
    pieces
}

fn split_clitic(seg: &str) -> (&str, Option<&str>) {
    let lower = seg.to_lowercase();
    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) && lower.len() == seg.len() {
            let cut = seg.len() - clitic.len();
            if seg.is_char_boundary(cut) {
                return (&seg[..cut], Some(&seg[cut..]));
            }
        }
    }
    (seg, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<&str> {
        tokenize(text).into_iter().map(|p| p.text).collect()
    }

    #[test]
    fn splits_words_and_punctuation() {
        assert_eq!(texts("Mr. President, I rise today."),
            vec!["Mr.", "President", ",", "I", "rise", "today", "."]);
    }

    #[test]
    fn keeps_country_abbreviation_whole() {
        assert_eq!(texts("the U.S. economy"), vec!["the", "U.S.", "economy"]);
    }

    #[test]
    fn splits_clitics() {
        assert_eq!(texts("We don't forget workers' rights or America's workers"),
            vec!["We", "do", "n't", "forget", "workers", "'", "rights", "or", "America", "'s", "workers"]);
    }

    #[test]
    fn records_offsets_and_whitespace() {
        let text = "Jobs.\n\nWages  matter";
        let pieces = tokenize(text);
        for p in &pieces {
            assert_eq!(&text[p.idx..p.end()], p.text);
        }
        assert!(!pieces[0].whitespace);
        assert!(pieces[1].whitespace);
        assert!(pieces[2].newline_before);
        assert!(!pieces[3].newline_before);
    }
}
