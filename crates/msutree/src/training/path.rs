//! Categorical columns chosen along the path from the root.

/// Ordered categorical-view column indices, one per ancestor split.
///
/// Each node owns its copy. A node extends its parent's path with one free
/// slot, fills the slot with each candidate in turn and hands a clone of the
/// winner's path to its children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedPath {
    columns: Vec<usize>,
}

impl SelectedPath {
    /// Empty path (the root).
    pub fn root() -> Self {
        Self::default()
    }

    /// Copy of this path with one trailing slot for a candidate column.
    ///
    /// The slot starts at column 0 until [`fill_last`](Self::fill_last) sets it.
    pub fn with_free_slot(&self) -> Self {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.extend_from_slice(&self.columns);
        columns.push(0);
        Self { columns }
    }

    /// Overwrite the last column.
    ///
    /// # Panics
    ///
    /// Panics if the path is empty.
    #[inline]
    pub fn fill_last(&mut self, column: usize) {
        let last = self
            .columns
            .last_mut()
            .expect("fill_last on a path without a free slot");
        *last = column;
    }

    #[inline]
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
