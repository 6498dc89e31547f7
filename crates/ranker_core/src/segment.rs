//! Best-effort split of a generated narrative into one section per ranked item.
//!
//! The narrative comes from a text generator that follows no strict grammar,
//! so recognition is heuristic and always has a fallback: if no section
//! header is recognised, every item gets the whole narrative.

use ranker_logging::ranker_debug;
use regex::Regex;

/// Lines opening with this glyph (after heading markers) start the synthesis.
const COMPARISON_GLYPH: char = '⚖';
const COMPARISON_OPENING: &str = "Then compare";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSection {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisSections {
    /// One entry per ranked item, in rank order.
    pub sections: Vec<AnalysisSection>,
    /// Trailing text discussing the items together.
    pub synthesis: Option<String>,
}

struct ItemMatcher {
    ordinal: Option<Regex>,
    heading_ordinal_label: Option<Regex>,
    heading_label: Option<Regex>,
}

impl ItemMatcher {
    fn new(position: usize, label: &str) -> Self {
        let ordinal = position + 1;
        let label = label.trim();
        // `1)`, `1.`, `**1.`, `1#`, but not `1.5` or `10.`
        let ordinal_pattern = format!(r"^\s*(?:\*\*|__)?{ordinal}\s*[).#](?:[^0-9]|$)");
        let (heading_ordinal_label, heading_label) = if label.is_empty() {
            (None, None)
        } else {
            let escaped = regex::escape(label);
            // The label must end where the emphasis closes or at punctuation,
            // so `**Artist**` is not taken for the label `Art`.
            let end = r"(?:\s*[.:!?]?\s*(?:\*{1,2}|_{1,2})|\s*[(:,\-–—]|\s*$)";
            (
                Regex::new(&format!(
                    r"(?i)^\s*#{{1,6}}\s*{ordinal}\s*[).:]?\s*(?:\*{{1,2}}|_{{1,2}})\s*{escaped}{end}"
                ))
                .ok(),
                Regex::new(&format!(
                    r"(?i)^\s*#{{1,6}}\s*(?:\*{{1,2}}|_{{1,2}})\s*{escaped}{end}"
                ))
                .ok(),
            )
        };
        Self {
            ordinal: Regex::new(&ordinal_pattern).ok(),
            heading_ordinal_label,
            heading_label,
        }
    }

    fn opens_section(&self, line: &str) -> bool {
        [
            &self.ordinal,
            &self.heading_ordinal_label,
            &self.heading_label,
        ]
        .into_iter()
        .flatten()
        .any(|regex| regex.is_match(line))
    }
}

/// Splits `narrative` into sections aligned with `labels` (rank order).
pub fn segment_analysis<S: AsRef<str>>(narrative: &str, labels: &[S]) -> AnalysisSections {
    let matchers: Vec<ItemMatcher> = labels
        .iter()
        .enumerate()
        .map(|(position, label)| ItemMatcher::new(position, label.as_ref()))
        .collect();
    let lines: Vec<&str> = narrative.lines().collect();

    let headers = find_headers(&lines, &matchers);
    let Some(&(last_header, _)) = headers.last() else {
        ranker_debug!(
            "segment_analysis: no section headers among {} lines, using fallback",
            lines.len()
        );
        return AnalysisSections {
            sections: labels
                .iter()
                .map(|label| AnalysisSection {
                    label: label.as_ref().to_string(),
                    text: narrative.to_string(),
                })
                .collect(),
            synthesis: None,
        };
    };

    // A split only counts if no section starts after it.
    let split = find_synthesis_split(&lines).filter(|split| split.marker_line > last_header);
    let end = split.map_or(lines.len(), |split| split.marker_line);

    let mut texts = vec![String::new(); labels.len()];
    for (index, &(start, item)) in headers.iter().enumerate() {
        let stop = headers
            .get(index + 1)
            .map_or(end, |&(next, _)| next)
            .min(end);
        let body = trim_section(&lines[start..stop]);
        if body.is_empty() {
            continue;
        }
        // The same item can be opened twice; keep both parts in order.
        if !texts[item].is_empty() {
            texts[item].push('\n');
        }
        texts[item].push_str(&body);
    }

    let synthesis = split.and_then(|split| {
        let text = lines[split.content_start..].join("\n").trim().to_string();
        let distinct = !texts.iter().any(|section| section.trim() == text);
        (!text.is_empty() && distinct).then_some(text)
    });

    ranker_debug!(
        "segment_analysis: {} headers for {} items, synthesis={}",
        headers.len(),
        labels.len(),
        synthesis.is_some()
    );

    AnalysisSections {
        sections: labels
            .iter()
            .zip(texts)
            .map(|(label, text)| AnalysisSection {
                label: label.as_ref().to_string(),
                text,
            })
            .collect(),
        synthesis,
    }
}

/// Returns `(line index, item index)` for every line that opens a section.
fn find_headers(lines: &[&str], matchers: &[ItemMatcher]) -> Vec<(usize, usize)> {
    let mut headers = Vec::new();
    let mut expected = 0;
    for (line_index, line) in lines.iter().enumerate() {
        // Expected next item first, then everything else in rank order.
        let hit = matchers
            .get(expected)
            .filter(|matcher| matcher.opens_section(line))
            .map(|_| expected)
            .or_else(|| {
                matchers
                    .iter()
                    .position(|matcher| matcher.opens_section(line))
            });
        if let Some(item) = hit {
            headers.push((line_index, item));
            expected = item + 1;
        }
    }
    headers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SynthesisSplit {
    /// Line where per-item sections stop.
    marker_line: usize,
    /// First line of the synthesis text.
    content_start: usize,
}

fn find_synthesis_split(lines: &[&str]) -> Option<SynthesisSplit> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            if is_horizontal_rule(line) {
                Some(SynthesisSplit {
                    marker_line: index,
                    content_start: index + 1,
                })
            } else if opens_comparison(line) {
                Some(SynthesisSplit {
                    marker_line: index,
                    content_start: index,
                })
            } else {
                None
            }
        })
        .last()
}

fn is_horizontal_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(first) = compact.chars().next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && compact.len() >= 3 && compact.chars().all(|c| c == first)
}

fn opens_comparison(line: &str) -> bool {
    let stripped = line
        .trim_start()
        .trim_start_matches('#')
        .trim_start()
        .trim_start_matches(['*', '_'])
        .trim_start();
    stripped.starts_with(COMPARISON_OPENING) || stripped.starts_with(COMPARISON_GLYPH)
}

/// Joins section lines, dropping trailing blank lines and rules.
fn trim_section(lines: &[&str]) -> String {
    let keep = lines
        .iter()
        .rposition(|line| !line.trim().is_empty() && !is_horizontal_rule(line))
        .map_or(0, |last| last + 1);
    lines[..keep].join("\n")
}
