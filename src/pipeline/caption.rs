//! Caption layout: XML escaping, word wrap, band geometry, SVG markup.
//!
//! Everything here is pure arithmetic over [`LayoutConfig`], so the layout of
//! a caption can be checked without decoding or encoding a single pixel.
//!
//! ```text
//!  ┌────────────────────────────── canvas ──────────────────────────────┐
//!  │                                                                    │
//!  │                        darkened base photo                         │
//!  │                                                                    │
//!  ├──────────────────────── band (75 % black) ─────────────────────────┤ ▲
//!  │              first line, centred, baseline = first_baseline        │ │ band_height
//!  │              next line, baseline + line_height                     │ ▼
//!  └────────────────────────────────────────────────────────────────────┘
//! ```

use crate::config::LayoutConfig;

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Greedy word wrap at whitespace.
///
/// A word joins the current line while `line + ' ' + word` stays within
/// `max_chars`; otherwise the line is closed and the word starts the next
/// one. Words are never split, so a word longer than `max_chars` sits alone
/// on its own line. Lengths are counted in `char`s.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Height of the caption band for `line_count` lines.
pub fn band_height(line_count: usize, layout: &LayoutConfig) -> u32 {
    let text_block = line_count as u32 * layout.line_height + 2 * layout.band_padding;
    text_block.max(layout.min_band_height).min(layout.canvas_height)
}

/// Baseline of the first line, measured from the top of the band.
pub fn first_baseline(line_count: usize, band_height: u32, layout: &LayoutConfig) -> f32 {
    let block = (line_count as u32 * layout.line_height) as f32;
    (band_height as f32 - block) / 2.0 + layout.font_size as f32
}

/// Wrapped caption plus its band geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    /// Escaped, wrapped lines, top to bottom.
    pub lines: Vec<String>,
    pub band_height: u32,
    pub first_baseline: f32,
}

impl CaptionLayout {
    pub fn new(title: &str, layout: &LayoutConfig) -> Self {
        let escaped = escape_xml(title);
        let lines = wrap_lines(&escaped, layout.chars_per_line);
        let band_height = band_height(lines.len(), layout);
        let first_baseline = first_baseline(lines.len(), band_height, layout);
        Self {
            lines,
            band_height,
            first_baseline,
        }
    }

    /// Top edge of the band in canvas coordinates.
    pub fn band_top(&self, layout: &LayoutConfig) -> u32 {
        layout.canvas_height - self.band_height
    }

    /// Baseline of line `index`, measured from the top of the band.
    pub fn baseline(&self, index: usize, layout: &LayoutConfig) -> f32 {
        self.first_baseline + (index as u32 * layout.line_height) as f32
    }

    /// SVG document covering the band, one centred `<text>` per line.
    ///
    /// Lines are already escaped and are inserted verbatim.
    pub fn to_svg(&self, layout: &LayoutConfig) -> String {
        let width = layout.canvas_width;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{h}" viewBox="0 0 {width} {h}">"#,
            h = self.band_height,
        );
        let family = escape_xml(&layout.font_family);
        for (i, line) in self.lines.iter().enumerate() {
            svg.push_str(&format!(
                r##"<text x="{x}" y="{y}" fill="#ffffff" font-size="{size}" font-family="{family}" font-weight="bold" text-anchor="middle">{line}</text>"##,
                x = width as f32 / 2.0,
                y = self.baseline(i, layout),
                size = layout.font_size,
            ));
        }
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five() {
        assert_eq!(escape_xml(r#"A & B <"c"> 'd'"#), "A &amp; B &lt;&quot;c&quot;&gt; &apos;d&apos;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn short_title_is_one_line() {
        assert_eq!(wrap_lines("Prime Minister Visits New York", 60), vec!["Prime Minister Visits New York"]);
    }

    #[test]
    fn empty_title_has_no_lines() {
        assert!(wrap_lines("", 60).is_empty());
        assert!(wrap_lines("   ", 60).is_empty());
    }

    #[test]
    fn long_word_is_never_split() {
        let word = "x".repeat(61);
        assert_eq!(wrap_lines(&word, 60), vec![word.clone()]);

        let text = format!("a {word} b");
        assert_eq!(wrap_lines(&text, 60), vec!["a".to_string(), word, "b".to_string()]);
    }

    #[test]
    fn line_closes_only_when_next_word_overflows() {
        // 29 + 1 + 30 = 60 fits exactly
        let a = "a".repeat(29);
        let b = "b".repeat(30);
        assert_eq!(wrap_lines(&format!("{a} {b}"), 60), vec![format!("{a} {b}")]);

        // 30 + 1 + 30 = 61 does not
        let a = "a".repeat(30);
        assert_eq!(wrap_lines(&format!("{a} {b}"), 60), vec![a, b]);
    }

    #[test]
    fn wrapping_counts_chars_not_bytes() {
        let word = "é".repeat(30);
        let text = format!("{word} {}", "é".repeat(29));
        assert_eq!(wrap_lines(&text, 60).len(), 1);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(wrap_lines("a   b\tc", 60), vec!["a b c"]);
    }

    #[test]
    fn band_height_floor_and_growth() {
        let layout = LayoutConfig::default();
        assert_eq!(band_height(0, &layout), 200);
        assert_eq!(band_height(1, &layout), 200);
        assert_eq!(band_height(2, &layout), 200);
        assert_eq!(band_height(3, &layout), 260);
        assert_eq!(band_height(5, &layout), 380);
    }

    #[test]
    fn band_never_exceeds_canvas() {
        let layout = LayoutConfig::default();
        assert_eq!(band_height(100, &layout), layout.canvas_height);
    }

    #[test]
    fn baseline_centres_text_block() {
        let layout = LayoutConfig::default();
        // (200 - 60) / 2 + 48
        assert_eq!(first_baseline(1, 200, &layout), 118.0);
        // (260 - 180) / 2 + 48
        assert_eq!(first_baseline(3, 260, &layout), 88.0);
    }

    #[test]
    fn layout_escapes_before_wrapping() {
        let layout = LayoutConfig::default();
        let caption = CaptionLayout::new("Tom & Jerry", &layout);
        assert_eq!(caption.lines, vec!["Tom &amp; Jerry"]);
        assert_eq!(caption.band_top(&layout), 880);
        assert_eq!(caption.baseline(0, &layout), 118.0);
    }

    #[test]
    fn svg_has_one_text_per_line() {
        let layout = LayoutConfig::default();
        let title = "Parliament Passes Budget For The Coming Fiscal Year Amid Opposition Protests In Kathmandu";
        let caption = CaptionLayout::new(title, &layout);
        assert_eq!(caption.lines.len(), 2);

        let svg = caption.to_svg(&layout);
        assert_eq!(svg.matches("<text ").count(), 2);
        assert!(svg.contains(r#"width="1920" height="200""#));
        assert!(svg.contains(r#"x="960""#));
        assert!(svg.contains(r#"y="88""#));
        assert!(svg.contains(r#"y="148""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"font-weight="bold""#));
    }
}
