//! Context extraction and token-bounded lossy compression.
//!
//! [`summarize`] classifies each line of input into pending actions, decisions,
//! key points, or ordinary content using a pluggable [`ExtractStrategy`].
//! [`compress`] assembles a summary that fits a token budget, preferring
//! decisions, then pending actions, then key points, then leading ordinary
//! content, and appends a truncation marker when anything was dropped.
//!
//! Both routines are total: any input, including empty strings and text with
//! zero extractable structure, produces a result rather than an error.

use serde::Serialize;

use crate::tokens::estimate;

/// Appended when compression had to drop content.
pub const TRUNCATION_MARKER: &str = "... [content truncated]";

const ACTION_MARKERS: [&str; 3] = ["todo", "fixme", "action"];
const DECISION_WORDS: [&str; 3] = ["decided", "agreed", "established"];
const BULLET_MARKERS: [char; 3] = ['-', '•', '*'];

/// Classification of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Line carried an action marker; payload is the text after the marker.
    PendingAction(String),
    /// Line carried decision vocabulary; payload is the trimmed line.
    Decision(String),
    /// Bulleted line without decision vocabulary; payload has the bullet stripped.
    KeyPoint(String),
    /// Any other non-blank line.
    Ordinary,
}

/// Line classification rule-set. The default keyword matcher can be swapped for
/// a stricter or model-based extractor without touching the store or engines.
pub trait ExtractStrategy: Send + Sync {
    fn classify(&self, line: &str) -> LineClass;
}

/// Default rule-set: action markers (`TODO`/`FIXME`/`ACTION`), decision
/// vocabulary (`decided`/`agreed`/`established`), and bullet markers, all
/// case-insensitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordExtractor;

impl ExtractStrategy for KeywordExtractor {
    fn classify(&self, line: &str) -> LineClass {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineClass::Ordinary;
        }

        for marker in ACTION_MARKERS {
            if let Some(pos) = find_ascii_ci(trimmed, marker) {
                let action = trimmed[pos + marker.len()..]
                    .trim_start_matches([':', '-', ' '])
                    .trim();
                return LineClass::PendingAction(action.to_string());
            }
        }

        let is_decision = DECISION_WORDS
            .iter()
            .any(|word| find_ascii_ci(trimmed, word).is_some());
        if is_decision {
            return LineClass::Decision(trimmed.to_string());
        }

        if trimmed.starts_with(BULLET_MARKERS) {
            let point = trimmed.trim_start_matches(BULLET_MARKERS).trim();
            return LineClass::KeyPoint(point.to_string());
        }

        LineClass::Ordinary
    }
}

/// Structured extraction result from [`summarize`].
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub key_points: Vec<String>,
    pub decisions: Vec<String>,
    pub pending_actions: Vec<String>,
    pub compressed_text: String,
}

/// Result of a [`compress`] call.
#[derive(Debug, Serialize)]
pub struct Compression {
    pub compressed_content: String,
    pub original_tokens: usize,
    pub compressed_tokens: usize,
    pub compression_ratio: f64,
}

struct Extraction {
    key_points: Vec<String>,
    decisions: Vec<String>,
    pending_actions: Vec<String>,
    ordinary: Vec<String>,
}

fn extract(strategy: &dyn ExtractStrategy, text: &str) -> Extraction {
    let mut ex = Extraction {
        key_points: Vec::new(),
        decisions: Vec::new(),
        pending_actions: Vec::new(),
        ordinary: Vec::new(),
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match strategy.classify(line) {
            LineClass::PendingAction(action) => ex.pending_actions.push(action),
            LineClass::Decision(decision) => ex.decisions.push(decision),
            LineClass::KeyPoint(point) => ex.key_points.push(point),
            LineClass::Ordinary => ex.ordinary.push(line.trim().to_string()),
        }
    }

    ex
}

/// Extract key points, decisions, and pending actions from `text` using the
/// default keyword rule-set.
pub fn summarize(text: &str) -> Summary {
    summarize_with(&KeywordExtractor, text)
}

/// Extract with an explicit rule-set.
pub fn summarize_with(strategy: &dyn ExtractStrategy, text: &str) -> Summary {
    let ex = extract(strategy, text);
    let compressed_text = render_sections(&ex);
    Summary {
        key_points: ex.key_points,
        decisions: ex.decisions,
        pending_actions: ex.pending_actions,
        compressed_text,
    }
}

fn render_sections(ex: &Extraction) -> String {
    let mut out = String::new();
    for decision in &ex.decisions {
        push_line(&mut out, decision);
    }
    for action in &ex.pending_actions {
        push_line(&mut out, &format!("ACTION: {action}"));
    }
    for point in &ex.key_points {
        push_line(&mut out, &format!("- {point}"));
    }
    for line in &ex.ordinary {
        push_line(&mut out, line);
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(line);
}

/// Compress `text` to fit within `target_tokens` using the default rule-set.
pub fn compress(text: &str, target_tokens: usize) -> Compression {
    compress_with(&KeywordExtractor, text, target_tokens)
}

/// Compress with an explicit rule-set.
///
/// When the input already fits the budget it is returned verbatim with ratio
/// 1.0 — compression is never lossy when it isn't needed.
pub fn compress_with(
    strategy: &dyn ExtractStrategy,
    text: &str,
    target_tokens: usize,
) -> Compression {
    let original_tokens = estimate(text);
    if original_tokens <= target_tokens {
        return Compression {
            compressed_content: text.to_string(),
            original_tokens,
            compressed_tokens: original_tokens,
            compression_ratio: 1.0,
        };
    }

    let ex = extract(strategy, text);

    // Reserve budget for the truncation marker so the final output stays at or
    // below the target.
    let content_budget = target_tokens.saturating_sub(estimate(TRUNCATION_MARKER) + 1);

    let mut out = String::new();
    let ordered = ex
        .decisions
        .iter()
        .cloned()
        .chain(ex.pending_actions.iter().map(|a| format!("ACTION: {a}")))
        .chain(ex.key_points.iter().map(|p| format!("- {p}")))
        .chain(ex.ordinary.iter().cloned());

    for line in ordered {
        let grown = if out.is_empty() {
            line
        } else {
            format!("{out}\n{line}")
        };
        if estimate(&grown) > content_budget {
            break;
        }
        out = grown;
    }

    let mut compressed_content = if out.is_empty() {
        TRUNCATION_MARKER.to_string()
    } else {
        format!("{out}\n{TRUNCATION_MARKER}")
    };

    // Degenerate budgets (smaller than the marker itself) fall back to plain
    // character truncation so the output never estimates above the original.
    if estimate(&compressed_content) > original_tokens {
        compressed_content = text.chars().take(target_tokens.saturating_mul(4)).collect();
    }

    let compressed_tokens = estimate(&compressed_content);
    Compression {
        compressed_content,
        original_tokens,
        compressed_tokens,
        compression_ratio: compressed_tokens as f64 / original_tokens as f64,
    }
}

/// ASCII case-insensitive substring search. The needle must be ASCII; a match
/// offset therefore always lands on a char boundary of the haystack.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
