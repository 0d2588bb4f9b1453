//! Preorder byte encoding of the prefix tree.
//!
//! A leaf is written as `1` followed by its byte value. An internal node is written as `0`
//! followed by its left subtree and then its right subtree. The encoding ends itself: the
//! reader is done exactly when the recursion returns to the root.

use log::trace;

use super::huffman::{Node, NodeKind, PrefixTree};
use crate::error::{Error, Result};

const INTERNAL_MARKER: u8 = 0;
const LEAF_MARKER: u8 = 1;

/// No tree built over 256 symbols nests deeper than this.
pub const MAX_DEPTH: usize = 256;

/// Append the preorder encoding of `tree` to `out`.
pub fn serialize(tree: &PrefixTree, out: &mut Vec<u8>) {
    let start = out.len();
    write_node(tree, tree.root(), out);
    trace!("Serialized prefix tree into {} bytes.", out.len() - start);
}

fn write_node(tree: &PrefixTree, index: usize, out: &mut Vec<u8>) {
    match tree.node(index).kind {
        NodeKind::Leaf(byte) => {
            out.push(LEAF_MARKER);
            out.push(byte);
        }
        NodeKind::Internal { left, right } => {
            out.push(INTERNAL_MARKER);
            write_node(tree, left, out);
            write_node(tree, right, out);
        }
    }
}

/// Rebuild a tree from the start of `bytes`. Returns the tree and the number of bytes it
/// took up. Nodes come back with weight 0.
pub fn deserialize(bytes: &[u8]) -> Result<(PrefixTree, usize)> {
    let mut reader = TreeReader {
        bytes,
        cursor: 0,
        nodes: Vec::new(),
    };
    let root = reader.read_node(None, 0)?;
    let used = reader.cursor;
    Ok((PrefixTree::from_parts(reader.nodes, root), used))
}

/// Byte cursor plus the arena being filled.
struct TreeReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
    nodes: Vec<Node>,
}

impl TreeReader<'_> {
    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.cursor)
            .ok_or(Error::TruncatedTree(self.cursor))?;
        self.cursor += 1;
        Ok(byte)
    }

    fn read_node(&mut self, parent: Option<usize>, depth: usize) -> Result<usize> {
        if depth > MAX_DEPTH {
            return Err(Error::TreeTooDeep(MAX_DEPTH));
        }
        let offset = self.cursor;
        let marker = self.next_byte()?;
        let index = self.nodes.len();
        match marker {
            LEAF_MARKER => {
                let byte = self.next_byte()?;
                self.nodes.push(Node {
                    weight: 0,
                    parent,
                    kind: NodeKind::Leaf(byte),
                });
            }
            INTERNAL_MARKER => {
                // Reserve the slot so children can point at it, then fill in the links.
                self.nodes.push(Node {
                    weight: 0,
                    parent,
                    kind: NodeKind::Internal { left: 0, right: 0 },
                });
                let left = self.read_node(Some(index), depth + 1)?;
                let right = self.read_node(Some(index), depth + 1)?;
                self.nodes[index].kind = NodeKind::Internal { left, right };
            }
            other => {
                return Err(Error::InvalidMarker {
                    marker: other,
                    offset,
                })
            }
        }
        Ok(index)
    }
}
