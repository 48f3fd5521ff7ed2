//! Extraction of fenced code blocks from completion text.
//!
//! An opening fence is three backticks at the start of a line (after optional
//! indentation). The rest of that line is the info string, usually a language
//! tag, and is discarded. Backticks that follow other text on a line are prose
//! and open nothing, unless the same line closes them again (```` ```code``` ````),
//! in which case the text between them is an inline block.
//!
//! A closing fence is a line holding nothing but backticks (at least three) and
//! whitespace. A fence line that carries an info string never closes a block;
//! it abandons the block in progress and opens a new one.
//!
//! The first complete, non-empty block wins. Empty blocks are skipped, and an
//! unterminated block ends the search.

const FENCE: &str = "```";

/// How the body of an opened block ended.
enum Body {
    /// Closing fence found. `interior_end` is where its line starts, `next`
    /// is where its line ends.
    Closed { interior_end: usize, next: usize },
    /// A fence line with an info string starts at `at`.
    Reopened { at: usize },
}

/// Return the interior of the first complete, non-empty fenced block.
pub fn first_fenced_block(text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find(FENCE) {
        let fence_at = search_from + rel;
        let after_open = fence_at + FENCE.len();
        let line_start = text[..fence_at].rfind('\n').map_or(0, |i| i + 1);
        let line_end = text[after_open..].find('\n').map(|i| after_open + i);
        let rest_of_line = &text[after_open..line_end.unwrap_or(text.len())];

        if let Some(close_rel) = rest_of_line.find(FENCE) {
            let interior = &rest_of_line[..close_rel];
            if !interior.trim().is_empty() {
                return Some(interior);
            }
            search_from = after_open + close_rel + FENCE.len();
            continue;
        }

        if !text[line_start..fence_at].trim().is_empty() {
            search_from = after_open;
            continue;
        }

        let body_start = line_end? + 1;
        match scan_body(text, body_start)? {
            Body::Closed { interior_end, next } => {
                let interior = strip_line_ending(&text[body_start..interior_end]);
                if !interior.trim().is_empty() {
                    return Some(interior);
                }
                search_from = next;
            }
            Body::Reopened { at } => search_from = at,
        }
    }
    None
}

/// The code to persist for a completion: the first fenced block, or the whole
/// text when it has none.
pub fn extract_code(text: &str) -> &str {
    first_fenced_block(text).unwrap_or(text)
}

fn scan_body(text: &str, from: usize) -> Option<Body> {
    let mut line_start = from;
    while line_start < text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);
        let line = text[line_start..line_end].trim();
        if is_closing_fence(line) {
            return Some(Body::Closed {
                interior_end: line_start,
                next: line_end,
            });
        }
        if line.starts_with(FENCE) {
            return Some(Body::Reopened { at: line_start });
        }
        line_start = line_end + 1;
    }
    None
}

fn is_closing_fence(line: &str) -> bool {
    line.len() >= FENCE.len() && line.bytes().all(|b| b == b'`')
}

fn strip_line_ending(interior: &str) -> &str {
    let interior = interior.strip_suffix('\n').unwrap_or(interior);
    interior.strip_suffix('\r').unwrap_or(interior)
}
