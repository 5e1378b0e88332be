//! Natural sort keys for file names.
//!
//! `img2.png` must come before `img10.png`, which plain lexicographic
//! ordering gets wrong. A [`SortKey`] splits a name into maximal runs of
//! ASCII digits and maximal runs of everything else; digit runs compare by
//! numeric magnitude, text runs compare case-folded, and the token sequences
//! compare left to right with the usual prefix rule (shorter sorts first).
//!
//! Digit runs are never parsed into machine integers — magnitude comparison
//! strips leading zeros and compares length, then digits — so zero padding
//! of any width is handled and nothing can overflow. Every token keeps its
//! raw spelling: rejoining the tokens reproduces the source string exactly.
//!
//! When a digit token meets a text token at the same position (the reference
//! left this undefined), the digit token orders first.

use std::cmp::Ordering;

/// One token of a [`SortKey`]: a digit run or a text fragment.
#[derive(Debug, Clone)]
pub enum Token {
    /// A maximal run of ASCII digits, raw spelling preserved.
    Number { raw: String },
    /// A maximal run of non-digits; `folded` is the lowercased form used
    /// for comparison, `raw` the original spelling.
    Text { raw: String, folded: String },
}

impl Token {
    fn from_run(raw: String, is_digits: bool) -> Self {
        if is_digits {
            Token::Number { raw }
        } else {
            let folded = raw.to_lowercase();
            Token::Text { raw, folded }
        }
    }

    /// The token's original spelling.
    pub fn raw(&self) -> &str {
        match self {
            Token::Number { raw } => raw,
            Token::Text { raw, .. } => raw,
        }
    }
}

/// Compare two digit runs by magnitude without parsing them.
///
/// Leading zeros are skipped; a longer remaining run is a larger number, and
/// equal lengths fall back to byte comparison (digits are ASCII).
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Number { raw: a }, Token::Number { raw: b }) => cmp_digit_runs(a, b),
            (Token::Text { folded: a, .. }, Token::Text { folded: b, .. }) => a.cmp(b),
            (Token::Number { .. }, Token::Text { .. }) => Ordering::Less,
            (Token::Text { .. }, Token::Number { .. }) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Token {}

/// An ordered, comparable key derived from one file name.
///
/// Only the leaf name should be keyed — directory prefixes must not
/// participate, so same-named files in different subdirectories sort
/// together. Equal keys (e.g. `img7` vs `img007`) are possible; callers
/// break those ties with a stable sort over discovery order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    tokens: Vec<Token>,
}

impl SortKey {
    /// Tokenize a file name into a key. An empty name yields an empty key,
    /// which sorts before everything.
    pub fn from_name(name: &str) -> Self {
        let mut tokens = Vec::new();
        let mut buf = String::new();
        let mut in_digits = false;

        for ch in name.chars() {
            let is_digit = ch.is_ascii_digit();
            if !buf.is_empty() && is_digit != in_digits {
                tokens.push(Token::from_run(std::mem::take(&mut buf), in_digits));
            }
            in_digits = is_digit;
            buf.push(ch);
        }
        if !buf.is_empty() {
            tokens.push(Token::from_run(buf, in_digits));
        }

        SortKey { tokens }
    }

    /// The tokens, in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Reassemble the source string from the raw token spellings.
    pub fn rejoin(&self) -> String {
        self.tokens.iter().map(Token::raw).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SortKey {
        SortKey::from_name(s)
    }

    #[test]
    fn numeric_runs_compare_as_integers() {
        assert!(key("img2.png") < key("img10.png"));
        assert!(key("page9.jpg") < key("page11.jpg"));
        assert!(key("2.png") < key("10.png"));
    }

    #[test]
    fn tokenize_rejoin_round_trips() {
        for name in [
            "img2.png",
            "IMG_0042 (copy).JPEG",
            "007-intro.webp",
            "no-digits.png",
            "42",
            "",
            "ünïcode5页.png",
        ] {
            assert_eq!(key(name).rejoin(), name, "round-trip failed for {name:?}");
        }
    }

    #[test]
    fn case_is_folded_for_comparison_only() {
        assert_eq!(key("Cover.PNG"), key("cover.png"));
        assert_eq!(key("Cover.PNG").rejoin(), "Cover.PNG");
    }

    #[test]
    fn zero_padding_compares_equal() {
        assert_eq!(key("img007.png"), key("img7.png"));
        assert!(key("img007.png") < key("img8.png"));
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let a = format!("x{}.png", "9".repeat(50));
        let b = format!("x1{}.png", "0".repeat(50));
        assert!(key(&a) < key(&b));
    }

    #[test]
    fn digit_token_orders_before_text_token() {
        // "1" vs "a" at position 0: the digit run wins.
        assert!(key("1.png") < key("a.png"));
    }

    #[test]
    fn shorter_key_is_a_prefix_and_sorts_first() {
        assert!(key("img") < key("img2"));
        assert!(key("") < key("a"));
    }

    #[test]
    fn full_ordering_example() {
        let mut names = vec!["b1.png", "a10.jpg", "a2.png"];
        names.sort_by_key(|n| key(n));
        assert_eq!(names, vec!["a2.png", "a10.jpg", "b1.png"]);
    }
}
