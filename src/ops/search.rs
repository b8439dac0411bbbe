use std::ops::Range;

/// In-document find/replace over the canonical text. The query is literal
/// (no regex metacharacters are interpreted) and matching is a plain
/// index-of scan, restarted from scratch after every query edit or replace
/// since offsets shift.
#[derive(Debug, Default)]
pub struct SearchState {
    query: String,
    matches: Vec<Range<usize>>,
    /// Index into `matches` of the current hit
    cursor: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        SearchState::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    /// Current hit as a 1-based "i of n" pair for the counter display
    pub fn ordinal(&self) -> Option<(usize, usize)> {
        self.cursor.map(|i| (i + 1, self.matches.len()))
    }

    pub fn current(&self) -> Option<Range<usize>> {
        self.cursor.and_then(|i| self.matches.get(i).cloned())
    }

    /// Set a new query and rescan. Clears everything on an empty query.
    pub fn set_query(&mut self, text: &str, query: &str) {
        self.query = query.to_string();
        self.rescan(text);
    }

    /// Full scan: collect every occurrence, including overlapping ones
    /// (the scan resumes one character past each hit's start).
    pub fn rescan(&mut self, text: &str) {
        self.matches.clear();
        self.cursor = None;
        if self.query.is_empty() {
            return;
        }
        let mut start = 0;
        while let Some(pos) = text[start..].find(&self.query) {
            let at = start + pos;
            self.matches.push(at..at + self.query.len());
            // Step one character, not one byte, so the scan stays on a
            // UTF-8 boundary
            start = at + text[at..].chars().next().map_or(1, |c| c.len_utf8());
        }
    }

    /// Advance to the next match, wrapping past the last back to the first
    pub fn find_next(&mut self) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) => (i + 1) % self.matches.len(),
        };
        self.cursor = Some(next);
        self.matches.get(next).cloned()
    }

    /// Step back to the previous match, wrapping from the first to the last
    pub fn find_prev(&mut self) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }
        let prev = match self.cursor {
            None => self.matches.len() - 1,
            Some(0) => self.matches.len() - 1,
            Some(i) => i - 1,
        };
        self.cursor = Some(prev);
        self.matches.get(prev).cloned()
    }

    /// Replace the current match in `text`, rescan, and land on the match
    /// at or after the edit point (wrapping to the first). Returns true
    /// when a replacement happened.
    pub fn replace_current(&mut self, text: &mut String, replacement: &str) -> bool {
        let Some(range) = self.current() else {
            return false;
        };
        let edit_end = range.start + replacement.len();
        text.replace_range(range, replacement);
        self.rescan(text);
        if !self.matches.is_empty() {
            let next = self
                .matches
                .iter()
                .position(|m| m.start >= edit_end)
                .unwrap_or(0);
            self.cursor = Some(next);
        }
        true
    }

    /// Replace every (non-overlapping) occurrence. Returns the count.
    pub fn replace_all(&mut self, text: &mut String, replacement: &str) -> usize {
        if self.query.is_empty() {
            return 0;
        }
        let occurrences = text.matches(&self.query).count();
        if occurrences > 0 {
            *text = text.replace(&self.query, replacement);
        }
        self.rescan(text);
        occurrences
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.cursor = None;
    }
}
