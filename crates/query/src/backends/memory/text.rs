//! Full-text matching for the in-memory backend.
//!
//! Text is split into lowercase alphanumeric words with their byte spans
//! in the original string, so matches can be highlighted in place.
//!
//! Free-text syntax:
//! - `farm subsidy` - both words must appear (in any searched field)
//! - `"farm bill"` - the words must appear consecutively
//! - `-dairy` - the word must not appear; on its own, matches every record
//!   without it
//! - `farm OR dairy` - either side may match

use std::collections::BTreeMap;

use crate::types::SearchTerm;

/// A word and its byte span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub start: usize,
    pub end: usize,
    pub word: String,
}

/// Splits text into lowercase words.
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                tokens.push(token(text, s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(token(text, s, text.len()));
    }
    tokens
}

fn token(text: &str, start: usize, end: usize) -> Token {
    Token {
        start,
        end,
        word: text[start..end].to_lowercase(),
    }
}

fn words(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.word).collect()
}

/// One alternative of a free-text query.
#[derive(Debug, Clone, Default, PartialEq)]
struct Group {
    required: Vec<Vec<String>>,
    excluded: Vec<Vec<String>>,
}

/// A compiled search term.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextQuery {
    groups: Vec<Group>,
}

/// A searched field's text and relevance weight.
#[derive(Debug, Clone)]
pub(crate) struct FieldText {
    pub field: String,
    pub weight: f64,
    pub text: String,
}

/// The outcome of matching one record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextMatch {
    pub score: f64,
    /// Matched fields in searched-field order.
    pub matched_fields: Vec<String>,
    /// Matched byte spans per field.
    pub spans: BTreeMap<String, Vec<(usize, usize)>>,
}

impl TextQuery {
    /// Compiles a search term.
    pub fn compile(term: &SearchTerm) -> Self {
        match term {
            SearchTerm::Phrase(text) => Self::phrase(text),
            SearchTerm::FreeText(text) => Self::free_text(text),
        }
    }

    fn phrase(text: &str) -> Self {
        let sequence = words(text);
        let groups = if sequence.is_empty() {
            Vec::new()
        } else {
            vec![Group {
                required: vec![sequence],
                excluded: Vec::new(),
            }]
        };
        Self { groups }
    }

    fn free_text(text: &str) -> Self {
        let mut groups = vec![Group::default()];
        let mut chars = text.chars().peekable();

        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            let negated = c == '-';
            if negated || c == '+' {
                chars.next();
            }

            let raw: String = if chars.peek() == Some(&'"') {
                chars.next();
                chars.by_ref().take_while(|&c| c != '"').collect()
            } else {
                let mut raw = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    raw.push(c);
                    chars.next();
                }
                if raw == "OR" && !negated {
                    groups.push(Group::default());
                    continue;
                }
                raw
            };

            let sequence = words(&raw);
            if sequence.is_empty() {
                continue;
            }
            if let Some(group) = groups.last_mut() {
                if negated {
                    group.excluded.push(sequence);
                } else {
                    group.required.push(sequence);
                }
            }
        }

        groups.retain(|g| !g.required.is_empty() || !g.excluded.is_empty());
        Self { groups }
    }

    /// Matches the query against a record's searched fields.
    ///
    /// Returns `None` unless at least one alternative matches. The score
    /// sums, over matching alternatives, each field's weight times its
    /// number of occurrences.
    pub fn evaluate(&self, fields: &[FieldText]) -> Option<TextMatch> {
        let tokenized: Vec<Vec<Token>> = fields.iter().map(|f| tokenize(&f.text)).collect();

        let mut result = TextMatch {
            score: 0.0,
            matched_fields: Vec::new(),
            spans: BTreeMap::new(),
        };
        let mut matched = false;

        for group in &self.groups {
            let excluded = group
                .excluded
                .iter()
                .any(|seq| tokenized.iter().any(|tokens| !find(tokens, seq).is_empty()));
            if excluded {
                continue;
            }

            let mut group_hits: Vec<(usize, (usize, usize))> = Vec::new();
            let mut all_present = true;
            for seq in &group.required {
                let before = group_hits.len();
                for (i, tokens) in tokenized.iter().enumerate() {
                    group_hits.extend(find(tokens, seq).into_iter().map(|span| (i, span)));
                }
                if group_hits.len() == before {
                    all_present = false;
                    break;
                }
            }
            if !all_present {
                continue;
            }

            matched = true;
            for (i, span) in group_hits {
                let field = &fields[i];
                result.score += field.weight;
                result.spans.entry(field.field.clone()).or_default().push(span);
            }
        }

        if !matched {
            return None;
        }
        result.matched_fields = fields
            .iter()
            .filter(|f| result.spans.contains_key(&f.field))
            .map(|f| f.field.clone())
            .collect();
        Some(result)
    }
}

/// Finds every occurrence of a word sequence, as byte spans.
fn find(tokens: &[Token], sequence: &[String]) -> Vec<(usize, usize)> {
    if sequence.is_empty() || tokens.len() < sequence.len() {
        return Vec::new();
    }
    tokens
        .windows(sequence.len())
        .filter(|window| window.iter().zip(sequence).all(|(t, w)| &t.word == w))
        .map(|window| (window[0].start, window[window.len() - 1].end))
        .collect()
}

/// Wraps matched spans in tags and trims long text to a window around the
/// first match. `size` is in bytes and is widened to char boundaries.
pub(crate) fn highlight(
    text: &str,
    spans: &[(usize, usize)],
    open: &str,
    close: &str,
    size: usize,
) -> String {
    let mut spans: Vec<(usize, usize)> = spans.to_vec();
    spans.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let (from, to) = match merged.first() {
        Some(&(first, _)) if size > 0 && text.len() > size => {
            let from = floor_boundary(text, first.saturating_sub(size / 4));
            let to = ceil_boundary(text, (from + size).min(text.len()));
            (from, to)
        }
        _ => (0, text.len()),
    };

    let mut out = String::with_capacity(to - from + merged.len() * (open.len() + close.len()));
    let mut cursor = from;
    for (start, end) in merged {
        if start < from || end > to {
            continue;
        }
        out.push_str(&text[cursor..start]);
        out.push_str(open);
        out.push_str(&text[start..end]);
        out.push_str(close);
        cursor = end;
    }
    out.push_str(&text[cursor..to]);
    out
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
