//! Attribute window shared by every node of one tree.
//!
//! The window is a single ordered sequence of predictor ids owned by the tree
//! build. Each node opens a [`WindowCursor`] over the *whole* sequence and
//! draws candidates by swap-to-tail removal, which reorders the shared
//! sequence in place. Children, and later siblings, start from the order the
//! previous search left behind. The same seed therefore reproduces the same
//! tree only if exactly one window is threaded through the recursion.

use rand::Rng;

/// Predictor ids in draw order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeWindow {
    ids: Vec<usize>,
}

impl AttributeWindow {
    /// Window over predictors `0..n_predictors`.
    pub fn new(n_predictors: usize) -> Self {
        Self {
            ids: (0..n_predictors).collect(),
        }
    }

    /// Current order of ids.
    #[inline]
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Start a node's search with every id live.
    pub fn cursor(&mut self) -> WindowCursor<'_> {
        let live = self.ids.len();
        WindowCursor {
            ids: &mut self.ids,
            live,
        }
    }
}

/// One node's pass over the window.
///
/// Drawn ids are moved behind the live region and are not drawn again by the
/// same cursor.
#[derive(Debug)]
pub struct WindowCursor<'a> {
    ids: &'a mut [usize],
    live: usize,
}

impl WindowCursor<'_> {
    /// Ids still available to this node.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Draw a live id uniformly at random, or `None` once all were drawn.
    ///
    /// Consumes exactly one random number per draw.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.live == 0 {
            return None;
        }
        let slot = rng.gen_range(0..self.live);
        let id = self.ids[slot];
        self.live -= 1;
        self.ids.swap(slot, self.live);
        Some(id)
    }
}
