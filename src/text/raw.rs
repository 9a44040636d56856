use crate::width::display_width;

use super::options::FitTuning;

/// Paragraph text plus the per-line character budget used to wrap it.
///
/// Values are immutable: [`RawText::shrink`] hands back a tighter copy so the
/// wrap search can be written as a fold over successive budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText {
    paragraphs: Vec<String>,
    character_limit: usize,
}

impl RawText {
    /// Split `text` into paragraphs at blank lines, flattening the newlines
    /// inside each paragraph. The initial budget is the longest paragraph, so
    /// the first wrap keeps every paragraph on one line.
    pub fn parse(text: &str) -> Self {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                push_paragraph(&mut paragraphs, &mut current);
            } else {
                current.push(line.trim());
            }
        }
        push_paragraph(&mut paragraphs, &mut current);

        let character_limit = paragraphs
            .iter()
            .map(|paragraph| display_width(paragraph))
            .max()
            .unwrap_or(0);

        Self {
            paragraphs,
            character_limit,
        }
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn character_limit(&self) -> usize {
        self.character_limit
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// The next tighter budget, or `None` once another step would go below
    /// the floor.
    pub fn shrink(&self, tuning: &FitTuning) -> Option<Self> {
        let scaled = (self.character_limit as f64 * tuning.shrink_factor).floor() as usize;
        let next = scaled.min(self.character_limit.saturating_sub(1));
        if next < tuning.character_floor.max(1) {
            return None;
        }

        Some(Self {
            paragraphs: self.paragraphs.clone(),
            character_limit: next,
        })
    }

    /// Greedy word wrap of every paragraph at the current budget.
    ///
    /// Paragraphs are separated by one empty line. A word longer than the
    /// budget sits alone on its own line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (idx, paragraph) in self.paragraphs.iter().enumerate() {
            if idx > 0 {
                lines.push(String::new());
            }
            wrap_paragraph(paragraph, self.character_limit, &mut lines);
        }
        lines
    }
}

fn push_paragraph(paragraphs: &mut Vec<String>, current: &mut Vec<&str>) {
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
        current.clear();
    }
}

fn wrap_paragraph(paragraph: &str, limit: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in paragraph.split_whitespace() {
        let word_width = display_width(word);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= limit {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
}
