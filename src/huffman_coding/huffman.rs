use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::{Display, Formatter};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::tools::freq_count::{distinct, freqs};

/// Longest code a Code can hold.
pub const MAX_CODE_BITS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(u8),
    Internal { left: usize, right: usize },
}

/// One node of the prefix tree. Children and parent are arena indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub parent: Option<usize>,
    pub kind: NodeKind,
}

impl Node {
    pub fn leaf(weight: u64, byte: u8) -> Node {
        Node {
            weight,
            parent: None,
            kind: NodeKind::Leaf(byte),
        }
    }
}

/// Binary merge tree over byte frequencies, stored as an arena of nodes.
#[derive(Debug, Clone)]
pub struct PrefixTree {
    nodes: Vec<Node>,
    root: usize,
}

impl PrefixTree {
    /// Build a tree over the byte frequencies of `data`. Returns None for empty data.
    pub fn from_data(data: &[u8]) -> Option<Self> {
        Self::from_freqs(&freqs(data))
    }

    /// Build a tree from a table of counts indexed by byte value. Returns None if every
    /// count is zero.
    ///
    /// Nodes are merged lowest weight first. Ties go to whichever node entered the queue
    /// first: leaves enter in byte order, each merged node enters after all that came before
    /// it. The first node popped becomes the left child.
    pub fn from_freqs(freqs: &[u64]) -> Option<Self> {
        let mut nodes: Vec<Node> = Vec::with_capacity(2 * distinct(freqs));
        let mut queue = BinaryHeap::new();

        for (byte, &weight) in freqs.iter().enumerate().take(256) {
            if weight > 0 {
                queue.push(Reverse((weight, nodes.len())));
                nodes.push(Node::leaf(weight, byte as u8));
            }
        }

        // Arena index doubles as the insertion sequence number
        while queue.len() > 1 {
            let Reverse((left_weight, left)) = queue.pop()?;
            let Reverse((right_weight, right)) = queue.pop()?;
            let parent = nodes.len();
            nodes[left].parent = Some(parent);
            nodes[right].parent = Some(parent);
            nodes.push(Node {
                weight: left_weight + right_weight,
                parent: None,
                kind: NodeKind::Internal { left, right },
            });
            queue.push(Reverse((left_weight + right_weight, parent)));
        }

        let Reverse((_, root)) = queue.pop()?;
        debug!(
            "Built prefix tree with {} nodes over {} symbols.",
            nodes.len(),
            distinct(freqs)
        );
        Some(Self { nodes, root })
    }

    /// Assemble a tree from an arena that already links its children. Used by the
    /// deserializer.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: usize) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Count of nodes in the arena.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if the whole tree is one leaf. Its code is empty and needs special handling.
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.nodes[self.root].kind, NodeKind::Leaf(_))
    }

    /// The leaf byte values, in preorder.
    #[cfg(test)]
    pub fn leaves(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |node| {
            if let NodeKind::Leaf(b) = node.kind {
                out.push(b)
            }
        });
        out
    }

    /// Preorder walk over the arena.
    #[cfg(test)]
    fn walk(&self, index: usize, visit: &mut impl FnMut(&Node)) {
        let node = &self.nodes[index];
        visit(node);
        if let NodeKind::Internal { left, right } = node.kind {
            self.walk(left, visit);
            self.walk(right, visit);
        }
    }

    /// True if both trees have the same shape and the same leaf values. Weights are
    /// ignored since they are not serialized.
    #[cfg(test)]
    pub fn same_shape(&self, other: &PrefixTree) -> bool {
        self.same_shape_at(self.root, other, other.root)
    }

    #[cfg(test)]
    fn same_shape_at(&self, a: usize, other: &PrefixTree, b: usize) -> bool {
        match (self.nodes[a].kind, other.nodes[b].kind) {
            (NodeKind::Leaf(x), NodeKind::Leaf(y)) => x == y,
            (
                NodeKind::Internal { left, right },
                NodeKind::Internal {
                    left: o_left,
                    right: o_right,
                },
            ) => {
                self.same_shape_at(left, other, o_left) && self.same_shape_at(right, other, o_right)
            }
            _ => false,
        }
    }

    /// Derive the code table: left edges append 0, right edges append 1.
    pub fn code_table(&self) -> Result<CodeTable> {
        let mut table = CodeTable::default();
        self.assign_codes(self.root, Code::default(), &mut table)?;
        trace!("Code table:\n{}", table);
        Ok(table)
    }

    fn assign_codes(&self, index: usize, code: Code, table: &mut CodeTable) -> Result<()> {
        match self.nodes[index].kind {
            NodeKind::Leaf(byte) => {
                table.0.insert(byte, code);
            }
            NodeKind::Internal { left, right } => {
                self.assign_codes(left, code.with_bit(false)?, table)?;
                self.assign_codes(right, code.with_bit(true)?, table)?;
            }
        }
        Ok(())
    }
}

/// A prefix code of up to 64 bits. The first bit of the code is the most significant of
/// the low `len` bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// Build a code from its value and length.
    #[cfg(test)]
    pub fn new(bits: u64, len: u8) -> Self {
        Self { bits, len }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// This code with one more bit on the end.
    fn with_bit(self, bit: bool) -> Result<Code> {
        if self.len as usize >= MAX_CODE_BITS {
            return Err(Error::CodeTooLong(MAX_CODE_BITS));
        }
        Ok(Code {
            bits: (self.bits << 1) | bit as u64,
            len: self.len + 1,
        })
    }

    /// True if this code is a prefix of (or equal to) `other`.
    #[cfg(test)]
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len
            && other
                .bits
                .checked_shr((other.len - self.len) as u32)
                .unwrap_or(0)
                == self.bits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", (self.bits >> i) & 1)?;
        }
        Ok(())
    }
}

/// Byte value to prefix code.
#[derive(Debug, Clone, Default)]
pub struct CodeTable(FxHashMap<u8, Code>);

impl CodeTable {
    pub fn get(&self, byte: u8) -> Option<Code> {
        self.0.get(&byte).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&u8, &Code)> {
        self.0.iter()
    }
}

impl Display for CodeTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_unstable_by_key(|(byte, _)| **byte);
        for (byte, code) in entries {
            writeln!(f, "      {:#04x}: {}", byte, code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_prefix_free(table: &CodeTable) {
        for (a, code_a) in table.iter() {
            for (b, code_b) in table.iter() {
                if a != b {
                    assert!(
                        !code_a.is_prefix_of(code_b),
                        "{} ({}) is a prefix of {} ({})",
                        code_a,
                        a,
                        code_b,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn empty_test() {
        assert!(PrefixTree::from_data(&[]).is_none());
    }

    #[test]
    fn single_symbol_test() {
        let tree = PrefixTree::from_data(&[b'A'; 1000]).unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.len(), 1);
        let table = tree.code_table().unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get(b'A').unwrap().is_empty());
    }

    #[test]
    fn known_shape_test() {
        // a:1 b:1 c:2. a and b tie and merge first in byte order, then c beats the merged
        // node on insertion order.
        let tree = PrefixTree::from_data(b"abcc").unwrap();
        assert_eq!(tree.len(), 5);
        let table = tree.code_table().unwrap();
        assert_eq!(table.get(b'c').unwrap().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "10");
        assert_eq!(table.get(b'b').unwrap().to_string(), "11");
        assert_eq!(tree.leaves(), b"cab".to_vec());
    }

    #[test]
    fn weights_and_parents_test() {
        let tree = PrefixTree::from_data(b"aaaabbc").unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.weight, 7);
        assert_eq!(root.parent, None);
        if let NodeKind::Internal { left, right } = root.kind {
            assert_eq!(tree.node(left).parent, Some(tree.root()));
            assert_eq!(tree.node(right).parent, Some(tree.root()));
            assert_eq!(tree.node(left).weight + tree.node(right).weight, 7);
        } else {
            panic!("root should be internal");
        }
    }

    #[test]
    fn deterministic_test() {
        let data = b"it was the best of times, it was the worst of times";
        let a = PrefixTree::from_data(data).unwrap();
        let b = PrefixTree::from_data(data).unwrap();
        assert!(a.same_shape(&b));
        assert_eq!(
            a.code_table().unwrap().to_string(),
            b.code_table().unwrap().to_string()
        );
    }

    #[test]
    fn prefix_free_test() {
        let samples: Vec<Vec<u8>> = vec![
            b"ab".to_vec(),
            b"it was the best of times, it was the worst of times".to_vec(),
            (0..=255).collect(),
            (0..4000_u32).map(|i| (i * i % 251) as u8).collect(),
        ];
        for data in samples {
            let tree = PrefixTree::from_data(&data).unwrap();
            let table = tree.code_table().unwrap();
            let mut present = freqs(&data);
            present.retain(|&f| f > 0);
            assert_eq!(table.len(), present.len());
            assert_prefix_free(&table);
        }
    }

    #[test]
    fn skewed_weights_test() {
        // Fibonacci weights give the deepest possible tree for this many symbols
        let mut counts = vec![0_u64; 256];
        let (mut x, mut y) = (1_u64, 1_u64);
        for c in counts.iter_mut().take(20) {
            *c = x;
            let z = x + y;
            x = y;
            y = z;
        }
        let tree = PrefixTree::from_freqs(&counts).unwrap();
        let table = tree.code_table().unwrap();
        let longest = table.iter().map(|(_, c)| c.len()).max().unwrap();
        assert_eq!(longest, 19);
        assert_prefix_free(&table);
    }

    #[test]
    fn code_display_test() {
        assert_eq!(Code::new(0b0110, 4).to_string(), "0110");
        assert!(Code::new(0b01, 2).is_prefix_of(&Code::new(0b0110, 4)));
        assert!(!Code::new(0b11, 2).is_prefix_of(&Code::new(0b0110, 4)));
    }
}
