//! Text rules applied to provider output: keyword formatting for the
//! completion model's answer and markup cleanup for search records.

use std::sync::OnceLock;

use regex::Regex;

/// Highlight markers the search engine wraps around matched terms.
pub const HIGHLIGHT_START: &str = "<!HS>";
pub const HIGHLIGHT_END: &str = "<!HE>";

/// Maximum number of keywords forwarded to the news search.
pub const MAX_KEYWORDS: usize = 2;

/// `<hN ...>...</hN>` with matching levels. The regex crate has no
/// backreferences, so each level gets its own alternative.
fn heading_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let levels: Vec<String> = (1..=6)
            .map(|n| format!(r"<h{n}\b[^>]*>.*?</h{n}\s*>"))
            .collect();
        Regex::new(&format!("(?is)(?:{})", levels.join("|"))).expect("heading pattern is valid")
    })
}

fn newline_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\r?\n)+").expect("newline pattern is valid"))
}

/// Reduce raw model output to at most two space-separated keywords.
///
/// Commas and double quotes are dropped, whitespace is collapsed, and only
/// the first [`MAX_KEYWORDS`] tokens survive.
pub fn format_keywords(raw: &str) -> String {
    raw.replace([',', '"'], "")
        .split_whitespace()
        .take(MAX_KEYWORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean_once(input: &str) -> String {
    let without_markers = input.replace(HIGHLIGHT_START, "").replace(HIGHLIGHT_END, "");
    let without_headings = heading_block().replace_all(&without_markers, "");
    newline_run().replace_all(&without_headings, "\n").into_owned()
}

/// Strip highlight markers and heading blocks, and collapse newline runs.
///
/// Applied until nothing changes, so `clean_text(clean_text(s)) == clean_text(s)`
/// even when a removal exposes a new marker.
pub fn clean_text(input: &str) -> String {
    let mut current = clean_once(input);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
