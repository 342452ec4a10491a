//! HeightIndex - O(log n) prefix sums and offset lookup via Fenwick tree
//!
//! Holds the effective pixel height of every display position and answers
//! "where does item `i` start" and "which item covers offset `y`".
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `top` / `bottom`: O(log n)
//! - `item_at`: O(log² n)
//! - `rebuild`: O(n log n)
//! - `total`: O(1)

/// Fenwick tree over per-item heights.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (0-indexed API over the `fenwick` crate).
    tree: Vec<i64>,
    /// Plain heights, for O(1) reads and deltas.
    heights: Vec<u32>,
    /// Sum of `heights`.
    total: u64,
}

impl HeightIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index over `heights`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.len(), 3);
    /// assert_eq!(index.total(), 45);
    /// ```
    pub fn from_heights(heights: impl IntoIterator<Item = u32>) -> Self {
        let mut index = Self::new();
        index.rebuild(heights);
        index
    }

    /// Replace every height.
    pub fn rebuild(&mut self, heights: impl IntoIterator<Item = u32>) {
        self.heights.clear();
        self.heights.extend(heights);
        self.tree.clear();
        self.tree.resize(self.heights.len(), 0);
        for (i, h) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, i64::from(*h));
        }
        self.total = self.heights.iter().map(|h| u64::from(*h)).sum();
    }

    /// Sets the height at `index`. Returns true if it changed.
    ///
    /// Out-of-range indices are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::from_heights([5, 5]);
    /// assert!(index.set(0, 10));
    /// assert!(!index.set(0, 10));
    /// assert_eq!(index.top(1), 10);
    /// ```
    pub fn set(&mut self, index: usize, height: u32) -> bool {
        let Some(current) = self.heights.get(index).copied() else {
            return false;
        };
        if current == height {
            return false;
        }
        let delta = i64::from(height) - i64::from(current);
        fenwick::array::update(&mut self.tree, index, delta);
        self.heights[index] = height;
        self.total = (self.total as i64 + delta).max(0) as u64;
        true
    }

    /// Height at `index` (0 when out of range).
    pub fn height(&self, index: usize) -> u32 {
        self.heights.get(index).copied().unwrap_or(0)
    }

    /// Offset at which `index` starts: sum of heights before it.
    ///
    /// `top(len())` equals `total()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.top(0), 0);
    /// assert_eq!(index.top(2), 7);
    /// assert_eq!(index.top(3), 12);
    /// ```
    pub fn top(&self, index: usize) -> u64 {
        match index {
            0 => 0,
            i if i >= self.heights.len() => self.total,
            i => fenwick::array::prefix_sum(&self.tree, i - 1).max(0) as u64,
        }
    }

    /// Offset at which `index` ends.
    pub fn bottom(&self, index: usize) -> u64 {
        self.top(index.saturating_add(1))
    }

    /// First index whose bottom lies strictly past `offset`.
    ///
    /// Returns `None` if `offset >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.item_at(0), Some(0));
    /// assert_eq!(index.item_at(10), Some(1));
    /// assert_eq!(index.item_at(44), Some(2));
    /// assert_eq!(index.item_at(45), None);
    /// ```
    pub fn item_at(&self, offset: u64) -> Option<usize> {
        if offset >= self.total {
            return None;
        }

        // Entry i covers [top(i), bottom(i))
        let mut left = 0;
        let mut right = self.heights.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if self.bottom(mid) > offset {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.heights.len()).then_some(left)
    }

    /// Sum of all heights.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True if the index holds no items.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
