use super::Packer;
use crate::model::Rect;

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf { occupied: bool },
    /// Children are indices into the arena; their rects partition the parent rect.
    Split { first: usize, second: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    rect: Rect,
    kind: NodeKind,
}

/// Binary space-partition packer over one square container.
///
/// Nodes live in a flat arena; the root is index 0. A leaf is either free or holds
/// exactly one slot. Inserting into a free leaf that is larger than the request splits it
/// along the axis with the larger leftover, so every split node owns two disjoint
/// children whose union is its own rectangle.
#[derive(Debug, Clone)]
pub struct TreePacker {
    size: u32,
    nodes: Vec<Node>,
}

impl TreePacker {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            nodes: vec![Node {
                rect: Rect::new(0, 0, size, size),
                kind: NodeKind::Leaf { occupied: false },
            }],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Rectangles of all occupied leaves, in arena order.
    pub fn occupied(&self) -> Vec<Rect> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf { occupied: true }))
            .map(|n| n.rect)
            .collect()
    }

    fn leaf_accepts(node: &Node, w: u32, h: u32) -> bool {
        match node.kind {
            NodeKind::Leaf { occupied } => !occupied && w <= node.rect.w && h <= node.rect.h,
            NodeKind::Split { .. } => false,
        }
    }

    /// Depth-first search, first child before second, for the leaf an insert would use.
    fn find_leaf(&self, w: u32, h: u32) -> Option<usize> {
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            match node.kind {
                NodeKind::Split { first, second } => {
                    stack.push(second);
                    stack.push(first);
                }
                NodeKind::Leaf { .. } => {
                    if Self::leaf_accepts(node, w, h) {
                        return Some(idx);
                    }
                }
            }
        }
        None
    }

    /// Splits leaf `idx` around a `w x h` request and returns the first child.
    fn split(&mut self, idx: usize, w: u32, h: u32) -> usize {
        let r = self.nodes[idx].rect;
        let leftover_w = r.w - w;
        let leftover_h = r.h - h;
        let (a, b) = if leftover_w > leftover_h {
            // vertical cut: request-wide column, remainder to the right
            (
                Rect::new(r.x, r.y, w, r.h),
                Rect::new(r.x + w, r.y, leftover_w, r.h),
            )
        } else {
            // horizontal cut: request-tall row, remainder below
            (
                Rect::new(r.x, r.y, r.w, h),
                Rect::new(r.x, r.y + h, r.w, leftover_h),
            )
        };
        let first = self.nodes.len();
        let free = NodeKind::Leaf { occupied: false };
        self.nodes.push(Node { rect: a, kind: free });
        self.nodes.push(Node { rect: b, kind: free });
        self.nodes[idx].kind = NodeKind::Split {
            first,
            second: first + 1,
        };
        first
    }
}

impl Packer for TreePacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        w > 0 && h > 0 && self.find_leaf(w, h).is_some()
    }

    fn insert(&mut self, w: u32, h: u32) -> Option<Rect> {
        if w == 0 || h == 0 {
            return None;
        }
        let mut idx = self.find_leaf(w, h)?;
        // A free leaf that fits needs at most two splits to reach an exact match.
        loop {
            let rect = self.nodes[idx].rect;
            if rect.w == w && rect.h == h {
                self.nodes[idx].kind = NodeKind::Leaf { occupied: true };
                return Some(rect);
            }
            idx = self.split(idx, w, h);
        }
    }
}
