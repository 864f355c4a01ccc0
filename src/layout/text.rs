/// Approximate glyph metrics for wrap estimation.
///
/// Caption text is not shaped; each char advances by a fixed fraction of the font size, with a
/// wider advance for CJK and full-width characters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphMetrics {
    pub font_size: f64,
    pub advance_em: f64,
    pub wide_advance_em: f64,
}

impl GlyphMetrics {
    pub fn char_advance(&self, c: char) -> f64 {
        let em = if is_wide(c) {
            self.wide_advance_em
        } else {
            self.advance_em
        };
        em * self.font_size
    }

    pub fn text_width(&self, s: &str) -> f64 {
        s.chars().map(|c| self.char_advance(c)).sum()
    }
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x11FF      // Hangul Jamo
        | 0x2E80..=0x303F    // CJK radicals, punctuation
        | 0x3040..=0x30FF    // Hiragana, Katakana
        | 0x3130..=0x318F    // Hangul compatibility Jamo
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF    // CJK unified ideographs
        | 0xAC00..=0xD7A3    // Hangul syllables
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60    // full-width forms
        | 0xFFE0..=0xFFE6)
}

/// Number of rows a single line of text occupies at `max_width` with greedy word wrap.
///
/// Words wider than the line are broken between chars. Blank text occupies no rows.
pub fn wrapped_rows(text: &str, max_width: f64, metrics: &GlyphMetrics) -> usize {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    if !(max_width > 0.0) {
        return 1;
    }

    let space = metrics.char_advance(' ');
    let mut rows = 1;
    let mut x = 0.0;

    for word in text.split_whitespace() {
        let w = metrics.text_width(word);
        let needed = if x > 0.0 { space + w } else { w };
        if x + needed <= max_width {
            x += needed;
            continue;
        }

        if x > 0.0 {
            rows += 1;
            x = 0.0;
        }
        if w <= max_width {
            x = w;
            continue;
        }

        for c in word.chars() {
            let a = metrics.char_advance(c);
            if x > 0.0 && x + a > max_width {
                rows += 1;
                x = 0.0;
            }
            x += a;
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: GlyphMetrics = GlyphMetrics {
        font_size: 10.0,
        advance_em: 1.0,
        wide_advance_em: 2.0,
    };

    #[test]
    fn short_text_fits_one_row() {
        assert_eq!(wrapped_rows("ab cd", 100.0, &M), 1);
    }

    #[test]
    fn wraps_between_words() {
        // "aaaa" = 40px, "bbbb" needs 50px with the space.
        assert_eq!(wrapped_rows("aaaa bbbb", 60.0, &M), 2);
        assert_eq!(wrapped_rows("aaaa bbbb", 90.0, &M), 1);
    }

    #[test]
    fn breaks_long_words() {
        assert_eq!(wrapped_rows("aaaaaaaaaa", 30.0, &M), 4);
    }

    #[test]
    fn wide_glyphs_take_more_space() {
        assert_eq!(wrapped_rows("한국어", 40.0, &M), 2);
        assert_eq!(M.text_width("가a"), 30.0);
    }

    #[test]
    fn blank_text_has_no_rows() {
        assert_eq!(wrapped_rows("   ", 100.0, &M), 0);
    }
}
