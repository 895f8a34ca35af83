//! Dendrogram for hierarchical clustering visualization.
//!
//! A dendrogram represents the nested structure of clusters produced
//! by agglomerative (bottom-up) clustering.
//!
//! Node ids follow the SciPy/MATLAB convention: leaves are `0..n`, and the
//! `i`-th merge creates node `n + i`.

use serde::Serialize;

use super::union_find::UnionFind;
use crate::error::{Error, Result};

/// A dendrogram representing hierarchical cluster merges.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged
/// - The height (linkage distance) at which they merged
/// - The size of the resulting cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dendrogram {
    /// Merge history in the order the merges were performed.
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Merge {
    /// First child node id.
    pub cluster_a: usize,
    /// Second child node id.
    pub cluster_b: usize,
    /// Linkage distance at which the merge occurred.
    pub height: f64,
    /// Number of leaves under the new node.
    pub size: usize,
}

impl Dendrogram {
    /// Create an empty dendrogram over `n_items` leaves.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge. The new node gets id `n_items + n_merges()`.
    ///
    /// Both children must be distinct, existing nodes (a leaf or an earlier
    /// merge) that have not been merged yet.
    pub fn add_merge(
        &mut self,
        cluster_a: usize,
        cluster_b: usize,
        height: f64,
        size: usize,
    ) -> Result<()> {
        let next = self.n_items + self.merges.len();
        let invalid = |message| Error::InvalidParameter {
            name: "merge",
            message,
        };
        if cluster_a == cluster_b {
            return Err(invalid("cannot merge a node with itself"));
        }
        if cluster_a >= next || cluster_b >= next {
            return Err(invalid("child is neither a leaf nor an earlier merge"));
        }
        let taken = |c: usize| self.merges.iter().any(|m| m.cluster_a == c || m.cluster_b == c);
        if taken(cluster_a) || taken(cluster_b) {
            return Err(invalid("child has already been merged"));
        }
        self.push_merge(cluster_a, cluster_b, height, size);
        Ok(())
    }

    /// Unchecked [`Dendrogram::add_merge`] for engines that track node ids
    /// themselves.
    pub(crate) fn push_merge(
        &mut self,
        cluster_a: usize,
        cluster_b: usize,
        height: f64,
        size: usize,
    ) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            height,
            size,
        });
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// True once all items hang under a single root.
    pub fn is_complete(&self) -> bool {
        self.merges.len() + 1 == self.n_items
    }

    /// Root node id of a complete dendrogram.
    pub fn root(&self) -> Option<usize> {
        self.is_complete()
            .then(|| self.n_items + self.merges.len() - 1)
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Merge heights in merge order (for visualization).
    pub fn heights(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.height).collect()
    }

    /// Children of an internal node; `None` for leaves and unknown ids.
    pub fn children(&self, node: usize) -> Option<(usize, usize)> {
        node.checked_sub(self.n_items)
            .and_then(|i| self.merges.get(i))
            .map(|m| (m.cluster_a, m.cluster_b))
    }

    /// Height of a node (0 for leaves).
    pub fn height_of(&self, node: usize) -> f64 {
        node.checked_sub(self.n_items)
            .and_then(|i| self.merges.get(i))
            .map_or(0.0, |m| m.height)
    }

    /// Cluster assignments for exactly `k` clusters.
    ///
    /// Applies the first `n - k` merges, leaving the `k - 1` last (highest)
    /// merges undone. Ids are numbered by first appearance over the leaves
    /// in item order, so item 0 is always in cluster 0.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 || k > self.n_items || self.n_items - k > self.merges.len() {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.n_items,
            });
        }
        let applied = self.n_items - k;
        Ok(self.labels_after(|i, _| i < applied))
    }

    /// Cluster assignments keeping only merges at or below `height`.
    pub fn cut_at_height(&self, height: f64) -> Vec<usize> {
        self.labels_after(|_, m| m.height <= height)
    }

    fn labels_after(&self, apply: impl Fn(usize, &Merge) -> bool) -> Vec<usize> {
        let n = self.n_items;
        let mut uf = UnionFind::new(n + self.merges.len());
        for (i, merge) in self.merges.iter().enumerate() {
            if apply(i, merge) {
                let node = n + i;
                uf.union(merge.cluster_a, node);
                uf.union(merge.cluster_b, node);
            }
        }

        // Renumber roots by first appearance.
        let mut ids = vec![usize::MAX; n + self.merges.len()];
        let mut next = 0;
        (0..n)
            .map(|leaf| {
                let root = uf.find(leaf);
                if ids[root] == usize::MAX {
                    ids[root] = next;
                    next += 1;
                }
                ids[root]
            })
            .collect()
    }

    /// Leaves in left-to-right drawing order.
    ///
    /// For an incomplete dendrogram the top-level subtrees are laid out in
    /// increasing node id.
    pub fn leaf_order(&self) -> Vec<usize> {
        let n = self.n_items;
        let total = n + self.merges.len();
        let mut has_parent = vec![false; total];
        for m in &self.merges {
            has_parent[m.cluster_a] = true;
            has_parent[m.cluster_b] = true;
        }

        let mut order = Vec::with_capacity(n);
        for top in (0..total).filter(|&id| !has_parent[id]) {
            let mut stack = vec![top];
            while let Some(node) = stack.pop() {
                match self.children(node) {
                    Some((a, b)) => {
                        stack.push(b);
                        stack.push(a);
                    }
                    None => order.push(node),
                }
            }
        }
        order
    }

    /// Newick rendering of a complete dendrogram.
    ///
    /// Branch lengths are the height differences between parent and child.
    pub fn to_newick(&self, labels: &[String]) -> Result<String> {
        if labels.len() != self.n_items {
            return Err(Error::InvalidParameter {
                name: "labels",
                message: "need exactly one label per leaf",
            });
        }
        let root = self.root().ok_or(Error::InvalidParameter {
            name: "dendrogram",
            message: "newick export needs a complete tree",
        })?;

        let mut out = String::new();
        self.write_newick(root, labels, &mut out);
        out.push(';');
        Ok(out)
    }

    fn write_newick(&self, node: usize, labels: &[String], out: &mut String) {
        match self.children(node) {
            None => out.push_str(&newick_label(&labels[node])),
            Some((a, b)) => {
                let h = self.height_of(node);
                out.push('(');
                for (i, child) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_newick(child, labels, out);
                    out.push_str(&format!(":{}", h - self.height_of(child)));
                }
                out.push(')');
            }
        }
    }
}

fn newick_label(label: &str) -> String {
    if label.chars().any(|c| " ()[]':;,".contains(c)) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_owned()
    }
}
