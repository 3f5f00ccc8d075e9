//! A bulk-loaded, STR-packed R-tree over envelopes.
//!
//! Built once per noding run and never updated: the Sort-Tile-Recursive
//! packing sorts entries by envelope centre (x, then y within vertical
//! slices) and groups them into nodes of capacity 10, repeating per level
//! until a single root remains.

use ordered_float::OrderedFloat;

use crate::geom::Envelope;

const NODE_CAPACITY: usize = 10;

#[derive(Clone, Debug)]
enum Children {
    /// Indices into `entries`.
    Items(Vec<usize>),
    /// Indices into `nodes`.
    Nodes(Vec<usize>),
}

#[derive(Clone, Debug)]
struct Node {
    env: Envelope,
    children: Children,
}

/// An immutable spatial index over `(Envelope, item)` entries.
///
/// Items are opaque `usize` ids (typically indices into some arena of the
/// caller's).
#[derive(Clone, Debug)]
pub struct StrTree {
    entries: Vec<(Envelope, usize)>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl StrTree {
    /// Bulk-load a tree from its entries.
    pub fn new(entries: Vec<(Envelope, usize)>) -> Self {
        let mut tree = StrTree {
            entries,
            nodes: Vec::new(),
            root: None,
        };
        if tree.entries.is_empty() {
            return tree;
        }

        let leaf_children: Vec<(Envelope, usize)> = tree
            .entries
            .iter()
            .enumerate()
            .map(|(i, (env, _))| (*env, i))
            .collect();
        let mut level = tree.pack_level(leaf_children, true);
        while level.len() > 1 {
            level = tree.pack_level(level, false);
        }
        tree.root = Some(level[0].1);
        tree
    }

    /// Pack one level of `(envelope, child index)` pairs into nodes,
    /// returning the next level up.
    fn pack_level(
        &mut self,
        mut children: Vec<(Envelope, usize)>,
        leaf: bool,
    ) -> Vec<(Envelope, usize)> {
        let n = children.len();
        let node_count = n.div_ceil(NODE_CAPACITY);
        let slice_count = (node_count as f64).sqrt().ceil() as usize;
        let slice_capacity = n.div_ceil(slice_count);

        children.sort_by_key(|(env, _)| OrderedFloat(env.centre_x()));

        let mut out = Vec::with_capacity(node_count);
        for slice in children.chunks_mut(slice_capacity) {
            slice.sort_by_key(|(env, _)| OrderedFloat(env.centre_y()));
            for group in slice.chunks(NODE_CAPACITY) {
                let mut env = group[0].0;
                for (child_env, _) in &group[1..] {
                    env.expand_to_include_env(child_env);
                }
                let idxs = group.iter().map(|(_, i)| *i).collect();
                self.nodes.push(Node {
                    env,
                    children: if leaf {
                        Children::Items(idxs)
                    } else {
                        Children::Nodes(idxs)
                    },
                });
                out.push((env, self.nodes.len() - 1));
            }
        }
        out
    }

    /// Visit the item id of every entry whose envelope intersects `env`.
    pub fn query(&self, env: &Envelope, visit: &mut impl FnMut(usize)) {
        if let Some(root) = self.root {
            self.query_node(root, env, visit);
        }
    }

    fn query_node(&self, node: usize, env: &Envelope, visit: &mut impl FnMut(usize)) {
        let node = &self.nodes[node];
        if !node.env.intersects(env) {
            return;
        }
        match &node.children {
            Children::Items(idxs) => {
                for &i in idxs {
                    let (entry_env, item) = &self.entries[i];
                    if entry_env.intersects(env) {
                        visit(*item);
                    }
                }
            }
            Children::Nodes(idxs) => {
                for &i in idxs {
                    self.query_node(i, env, visit);
                }
            }
        }
    }
}
