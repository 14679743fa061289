//! Rendering boundary for question and answer text.
//!
//! Formatters only ever see display text. Nothing in the engine consults them.

use std::sync::LazyLock;

use regex::Regex;

const BULLET: char = '\u{2022}';

static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s").expect("step marker pattern is valid"));
static STEP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("step prefix pattern is valid"));
static OPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-D]\.)\s*").expect("option label pattern is valid"));

/// A renderable unit of formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Bullet(String),
    List {
        label: Option<String>,
        items: Vec<ListItem>,
    },
    Inline(Vec<Span>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Step(String),
    Bullet(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Code(String),
}

/// Pair of pure formatting functions injected by the host.
pub trait TextFormatter {
    fn format_question(&self, text: &str) -> Vec<Block>;
    fn format_answer(&self, text: &str) -> Block;
}

/// Plain-text formatter.
///
/// Questions split into paragraphs on newlines and bullets. Answers with
/// numbered steps or bullets become lists; anything else is inline text where
/// backtick-delimited segments are code.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl TextFormatter for PlainFormatter {
    fn format_question(&self, text: &str) -> Vec<Block> {
        let bulleted = text.contains(BULLET);
        text.split(['\n', BULLET])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                if bulleted {
                    Block::Bullet(part.to_string())
                } else {
                    Block::Paragraph(part.to_string())
                }
            })
            .collect()
    }

    fn format_answer(&self, text: &str) -> Block {
        if STEP_MARKER.is_match(text) || text.contains(BULLET) {
            format_list(text)
        } else {
            format_inline(text)
        }
    }
}

fn format_list(text: &str) -> Block {
    let (label, rest) = match OPTION_LABEL.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            (caps.get(1).map(|m| m.as_str().to_string()), &text[whole..])
        }
        None => (None, text),
    };

    let mut cuts: Vec<usize> = STEP_MARKER.find_iter(rest).map(|m| m.start()).collect();
    if cuts.first() != Some(&0) {
        cuts.insert(0, 0);
    }
    cuts.push(rest.len());

    let items = cuts
        .windows(2)
        .map(|w| &rest[w[0]..w[1]])
        .flat_map(|step| step.split(BULLET))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if STEP_PREFIX.is_match(part) {
                ListItem::Step(part.to_string())
            } else {
                ListItem::Bullet(part.to_string())
            }
        })
        .collect();

    Block::List { label, items }
}

fn format_inline(text: &str) -> Block {
    let spans = text
        .split('`')
        .enumerate()
        .filter_map(|(idx, part)| {
            let part = part.trim();
            if part.is_empty() {
                None
            } else if idx % 2 == 1 {
                Some(Span::Code(part.to_string()))
            } else {
                Some(Span::Text(part.to_string()))
            }
        })
        .collect();
    Block::Inline(spans)
}
