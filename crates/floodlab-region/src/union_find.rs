//! Disjoint-set forest over flattened grid indices
//!
//! Every labeling algorithm registers samples in the forest as it visits
//! them and merges components by attaching one root under another. Which
//! root survives a merge is always the caller's decision; the forest never
//! balances by rank.
//!
//! Unvisited samples hold the [`UNVISITED`] sentinel and must never be
//! passed to [`DisjointSet::find`].

/// Parent value of a sample that has not been registered
pub const UNVISITED: usize = usize::MAX;

/// Parent-pointer forest with path compression
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    /// Create a forest of `len` unregistered samples
    pub fn new(len: usize) -> Self {
        DisjointSet {
            parent: vec![UNVISITED; len],
        }
    }

    /// Number of slots (registered or not)
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True if the forest has no slots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Register `i` as a singleton root
    #[inline]
    pub fn make_set(&mut self, i: usize) {
        self.parent[i] = i;
    }

    /// True if `i` has been registered
    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.parent[i] != UNVISITED
    }

    /// True if `i` is a registered root
    #[inline]
    pub fn is_root(&self, i: usize) -> bool {
        self.parent[i] == i
    }

    /// Raw parent pointer of `i` ([`UNVISITED`] if unregistered)
    #[inline]
    pub fn parent(&self, i: usize) -> usize {
        self.parent[i]
    }

    /// Find the root of `i`, compressing the visited path
    ///
    /// Iterative, so pathological chains cannot overflow the stack.
    pub fn find(&mut self, i: usize) -> usize {
        debug_assert!(self.contains(i), "find() on unregistered index {i}");

        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge two components by making `child` a child of `root`
    ///
    /// Both arguments must already be roots.
    #[inline]
    pub fn attach(&mut self, child: usize, root: usize) {
        debug_assert!(self.is_root(child), "attach() child {child} is not a root");
        debug_assert!(self.is_root(root), "attach() target {root} is not a root");
        self.parent[child] = root;
    }

    /// Point every registered sample directly at its root
    ///
    /// `order` is the order in which samples were registered. Roots are only
    /// ever attached under samples registered later, so walking `order`
    /// backwards sees each parent before its children and a single
    /// `parent[i] = parent[parent[i]]` step suffices.
    pub fn flatten<I>(&mut self, order: I)
    where
        I: DoubleEndedIterator<Item = usize>,
    {
        for i in order.rev() {
            let p = self.parent[i];
            if p == UNVISITED || p == i {
                continue;
            }
            self.parent[i] = self.parent[p];
            debug_assert!(self.is_root(self.parent[i]));
        }
    }

    /// Assign sequential labels to the components of a flattened forest
    ///
    /// Labels `1..=K` are issued in raster order of each component's first
    /// sample. Components whose root fails `keep` and unregistered samples
    /// get 0. Returns the label buffer and `K`.
    pub fn assign_labels<F>(&self, mut keep: F) -> (Vec<u32>, u32)
    where
        F: FnMut(usize) -> bool,
    {
        const UNDECIDED: u32 = u32::MAX;

        let n = self.parent.len();
        let mut labels = vec![0u32; n];
        let mut root_label = vec![UNDECIDED; n];
        let mut count = 0u32;

        for i in 0..n {
            let root = self.parent[i];
            if root == UNVISITED {
                continue;
            }
            if root_label[root] == UNDECIDED {
                root_label[root] = if keep(root) {
                    count += 1;
                    count
                } else {
                    0
                };
            }
            labels[i] = root_label[root];
        }

        (labels, count)
    }
}
