//! Length-bounded trimming at sentence or word boundaries.
//!
//! All bounds are counted in characters so accented Italian text never
//! splits inside a UTF-8 sequence.

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut `text` to at most `max_len` characters, preferring a sentence
/// boundary, then a word boundary, then a hard cut.
///
/// The result never exceeds `max_len` characters and carries no
/// surrounding whitespace.
pub fn trim_to_len(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if char_len(text) <= max_len {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_len).collect();

    // A sentence-terminal mark past the midpoint beats a harder cutoff
    let mut last_sentence_end = None;
    for (pos, ch) in cut.chars().enumerate() {
        if matches!(ch, '.' | '!' | '?') {
            last_sentence_end = Some(pos);
        }
    }
    if let Some(pos) = last_sentence_end {
        if pos as f64 > max_len as f64 * 0.5 {
            let kept: String = cut.chars().take(pos + 1).collect();
            return kept.trim_end().to_string();
        }
    }

    if let Some(idx) = cut.rfind(' ') {
        if idx > 0 {
            return cut[..idx].trim_end().to_string();
        }
    }

    cut.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_bound_returned_trimmed() {
        assert_eq!(trim_to_len("  breve  ", 150), "breve");
    }

    #[test]
    fn test_cuts_at_sentence_boundary() {
        let text = "Prima frase completa. Seconda frase che verrà tagliata via del tutto";
        let out = trim_to_len(text, 30);
        assert_eq!(out, "Prima frase completa.");
    }

    #[test]
    fn test_ignores_early_sentence_mark() {
        // The period sits before the midpoint, so the cut falls on a space
        let text = "Si. Una frase molto lunga senza altri segni di punteggiatura qui";
        let out = trim_to_len(text, 40);
        assert!(char_len(&out) <= 40);
        assert!(!out.ends_with('.'));
        assert!(!out.ends_with(' '));
    }

    #[test]
    fn test_cuts_at_word_boundary() {
        let out = trim_to_len("uno due tre quattro cinque", 12);
        assert_eq!(out, "uno due tre");
    }

    #[test]
    fn test_hard_cut_without_spaces() {
        let out = trim_to_len(&"a".repeat(200), 150);
        assert_eq!(char_len(&out), 150);
    }

    #[test]
    fn test_never_exceeds_bound() {
        for max in [1usize, 5, 20, 60, 150] {
            let out = trim_to_len("Raccordo a gomito DKOL 3/8 per impianti oleodinamici.", max);
            assert!(char_len(&out) <= max, "len {} > {}", char_len(&out), max);
            assert_eq!(out, out.trim());
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let accented = "qualità però già più così ancora di seguito qui adesso";
        let out = trim_to_len(accented, 20);
        assert!(char_len(&out) <= 20);
    }
}
