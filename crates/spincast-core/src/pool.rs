// Pool manager: the ordered list of candidate items and its slice geometry.

use crate::error::SpinError;

/// Split newline-delimited raw text into pool items.
///
/// Each line is trimmed; blank lines are dropped. Duplicates are kept and
/// become distinct slices.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The current ordered set of selectable items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pool {
    items: Vec<String>,
}

impl Pool {
    /// Build a pool from already-parsed items, trimming and dropping blanks
    /// the same way `parse_list` does.
    pub fn new(items: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let items = items
            .into_iter()
            .map(|item| item.as_ref().trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        Pool { items }
    }

    pub fn from_raw(raw: &str) -> Self {
        Pool {
            items: parse_list(raw),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Angular width of one slice in degrees, or `None` for an empty pool
    /// (which cannot be spun).
    pub fn slice_angle(&self) -> Option<f64> {
        if self.items.is_empty() {
            None
        } else {
            Some(360.0 / self.items.len() as f64)
        }
    }

    /// Remove exactly one item by position, preserving the order of the rest.
    pub fn remove_at(&mut self, index: usize) -> Result<String, SpinError> {
        if index >= self.items.len() {
            return Err(SpinError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
