// ABOUTME: Message text renderer. Splits message text into plain and link segments.
// ABOUTME: Any http(s) URL up to the next whitespace becomes a link segment.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// One display piece of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { url: String },
}

/// Split `text` into plain-text and link segments, in order.
///
/// Empty plain pieces between adjacent URLs or at the edges are dropped, so
/// text without URLs yields a single `Text` segment (none for empty text).
pub fn render(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in URL_PATTERN.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text(text[last..m.start()].to_string()));
        }
        segments.push(Segment::Link {
            url: m.as_str().to_string(),
        });
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }

    segments
}
