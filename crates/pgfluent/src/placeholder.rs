//! `?` → `$N` placeholder numbering.

use std::fmt::Write;

/// Sequential placeholder counter shared by every clause of one builder.
///
/// The counter starts at 0 and only grows. Numbers are handed out while a
/// condition is scanned, so callers must rewrite *before* appending the
/// matching argument values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placeholders {
    counter: usize,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placeholders handed out so far.
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Allocate the next placeholder and return its number.
    pub fn allocate(&mut self) -> usize {
        self.counter += 1;
        self.counter
    }

    /// Allocate the next placeholder and write it as `$N`.
    pub fn push_next(&mut self, out: &mut String) {
        let n = self.allocate();
        let _ = write!(out, "${n}");
    }

    /// Replace every literal `?` in `condition` with the next `$N`.
    ///
    /// Everything else is copied through, including any `$N` the caller
    /// already wrote. A condition without `?` comes back unchanged and leaves
    /// the counter alone.
    pub fn rewrite(&mut self, condition: &str) -> String {
        if !condition.contains('?') {
            return condition.to_string();
        }

        let mut out = String::with_capacity(condition.len() + 8);
        let mut last = 0;
        for (index, _) in condition.match_indices('?') {
            out.push_str(&condition[last..index]);
            self.push_next(&mut out);
            last = index + 1;
        }
        out.push_str(&condition[last..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_in_order() {
        let mut ph = Placeholders::new();
        let out = ph.rewrite("SELECT * FROM users WHERE id = ? AND name = ?");
        assert_eq!(out, "SELECT * FROM users WHERE id = $1 AND name = $2");
        assert_eq!(ph.count(), 2);
    }

    #[test]
    fn continues_from_previous_counter() {
        let mut ph = Placeholders::new();
        ph.rewrite("a = ?");
        ph.allocate();
        assert_eq!(ph.rewrite("b = ? OR c = ?"), "b = $3 OR c = $4");
        assert_eq!(ph.count(), 4);
    }

    #[test]
    fn no_markers_is_verbatim() {
        let mut ph = Placeholders::new();
        ph.rewrite("x = ?");
        let out = ph.rewrite("deleted_at IS NULL");
        assert_eq!(out, "deleted_at IS NULL");
        assert_eq!(ph.count(), 1);
    }

    #[test]
    fn existing_numbered_placeholders_pass_through() {
        let mut ph = Placeholders::new();
        assert_eq!(ph.rewrite("a = $7 AND b = ?"), "a = $7 AND b = $1");
    }

    #[test]
    fn adjacent_and_edge_markers() {
        let mut ph = Placeholders::new();
        assert_eq!(ph.rewrite("??"), "$1$2");
        assert_eq!(ph.rewrite("?"), "$3");
        assert_eq!(ph.rewrite("é = ?, ü"), "é = $4, ü");
    }

    #[test]
    fn marker_count_matches_placeholder_count() {
        for (input, markers) in [("", 0), ("?", 1), ("a ? b ? c ?", 3), ("no marks", 0)] {
            let mut ph = Placeholders::new();
            let out = ph.rewrite(input);
            assert_eq!(ph.count(), markers);
            assert_eq!(out.matches('$').count(), markers);
            assert!(!out.contains('?'));
        }
    }
}
