//! Huffman tree construction with a replayable merge log.
//!
//! # Algorithm
//!
//! 1. One leaf per distinct symbol, ids `0..k` in first-occurrence order
//! 2. Snapshot the leaves in that order ("Initial nodes")
//! 3. Repeatedly take the two smallest nodes under the total order
//!    `(weight, id)`, merge them under a fresh id (first taken = left child),
//!    and snapshot the survivors in `(weight, id)` order followed by the new
//!    node
//! 4. The last node standing is the root
//!
//! Nodes live in an arena indexed by id. Ids are handed out once, in
//! creation order, so the arena is append-only and a child id is always
//! smaller than its parent's.
//!
//! # Codes
//!
//! Left edges are `0`, right edges `1`. A tree made of a single leaf has
//! depth zero, so that leaf is given the one-bit code `"0"`.
//!
//! # Determinism
//!
//! Selection never depends on container iteration order or sort stability:
//! the active set is a `BTreeSet<(weight, id)>`, and ids are unique. The set
//! only drives selection; snapshot order is built separately. Two runs
//! over the same input produce identical merge logs.

use crate::bitio::{BitReader, BitWriter, PackedBits};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::{serialize_opt_symbol, symbol_label, symbol_text, Symbol};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Creation-order id of a node; also its index in the arena.
pub type NodeId = usize;

/// Leaf or internal node payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { symbol: Symbol },
    Internal { left: NodeId, right: NodeId },
}

/// A node in the Huffman arena. Never modified after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanNode {
    pub id: NodeId,
    pub weight: u64,
    pub kind: NodeKind,
}

impl HuffmanNode {
    pub fn symbol(&self) -> Option<Symbol> {
        match self.kind {
            NodeKind::Leaf { symbol } => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// `(left, right)` for internal nodes.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { left, right } => Some((left, right)),
        }
    }

    /// Short form used in merge descriptions: `'A':3` or `*:5`.
    pub fn label(&self) -> String {
        match self.kind {
            NodeKind::Leaf { symbol } => format!("'{}':{}", symbol_label(symbol), self.weight),
            NodeKind::Internal { .. } => format!("*:{}", self.weight),
        }
    }

    fn summary(&self) -> NodeSummary {
        let (left, right) = match self.children() {
            Some((l, r)) => (Some(l), Some(r)),
            None => (None, None),
        };
        NodeSummary {
            id: self.id,
            symbol: self.symbol(),
            weight: self.weight,
            left,
            right,
        }
    }
}

/// Shallow view of an active node, as recorded in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    /// Symbol for leaves, `None` for internal nodes
    #[serde(serialize_with = "serialize_opt_symbol")]
    pub symbol: Option<Symbol>,
    pub weight: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// Active set at one point of the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HuffmanSnapshot {
    /// Active nodes: leaves in first-occurrence order for the initial
    /// snapshot, otherwise the survivors in `(weight, id)` order with the
    /// merged node last
    pub active_nodes: Vec<NodeSummary>,
    pub description: String,
    /// Ids of the two nodes merged to reach this state (left, right)
    pub merged_pair: Option<(NodeId, NodeId)>,
    /// Id of the node the merge created
    pub merged_node_id: Option<NodeId>,
}

/// Nested view of the finished tree for layout engines.
///
/// Leaves are named `"<symbol> (<weight>)"`, internal nodes have an empty
/// name. Children are listed left then right and omitted for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub name: String,
    pub weight: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

/// Arena holding every node created during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: Option<NodeId>,
}

impl HuffmanTree {
    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.map(|id| &self.nodes[id])
    }

    pub fn node(&self, id: NodeId) -> Option<&HuffmanNode> {
        self.nodes.get(id)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[HuffmanNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, weight: u64, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(HuffmanNode { id, weight, kind });
        id
    }

    /// Build the nested hierarchy rooted at the tree's root.
    pub fn hierarchy(&self) -> Option<HierarchyNode> {
        self.root.map(|id| self.hierarchy_at(id))
    }

    fn hierarchy_at(&self, id: NodeId) -> HierarchyNode {
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::Leaf { symbol } => HierarchyNode {
                id,
                name: format!("{} ({})", symbol_label(symbol), node.weight),
                weight: node.weight,
                children: Vec::new(),
            },
            NodeKind::Internal { left, right } => HierarchyNode {
                id,
                name: String::new(),
                weight: node.weight,
                children: vec![self.hierarchy_at(left), self.hierarchy_at(right)],
            },
        }
    }

    /// Decode a payload produced by [`CodeTable::pack`] by walking the tree.
    ///
    /// A single-leaf tree reads one `0` bit per symbol.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyTree` if the tree has no root and `packed` is non-empty
    /// - `HuffmanError::InvalidCode` if the bits leave the tree or stop mid-code
    pub fn decode(&self, packed: &PackedBits) -> Result<Vec<Symbol>> {
        let Some(root) = self.root() else {
            return if packed.bit_len() == 0 {
                Ok(Vec::new())
            } else {
                Err(HuffmanError::EmptyTree.into())
            };
        };

        let mut reader = BitReader::new(packed);
        let mut output = Vec::new();

        if let NodeKind::Leaf { symbol } = root.kind {
            while !reader.is_empty() {
                let position = reader.position() as usize;
                if reader.read_bit()? {
                    return Err(HuffmanError::InvalidCode { position }.into());
                }
                output.push(symbol);
            }
            return Ok(output);
        }

        let mut current = root;
        let mut code_start = 0usize;
        while !reader.is_empty() {
            let bit = reader.read_bit()?;
            let (left, right) = current
                .children()
                .ok_or(HuffmanError::InvalidCode { position: code_start })?;
            current = &self.nodes[if bit { right } else { left }];
            if let NodeKind::Leaf { symbol } = current.kind {
                output.push(symbol);
                current = root;
                code_start = reader.position() as usize;
            }
        }

        if current.id != root.id {
            return Err(HuffmanError::InvalidCode { position: code_start }.into());
        }
        Ok(output)
    }
}

/// Result of [`build_huffman`]: the merge log and the finished tree.
#[derive(Debug, Clone, Default)]
pub struct HuffmanBuild {
    pub snapshots: Vec<HuffmanSnapshot>,
    pub tree: HuffmanTree,
}

/// Count symbols in `input` and build its Huffman tree.
pub fn build_huffman(input: &[u8]) -> HuffmanBuild {
    build_from_frequencies(&FrequencyTable::from_input(input))
}

/// Build a Huffman tree from an existing frequency table.
///
/// Emits `1 + (k - 1)` snapshots for `k >= 1` distinct symbols and none for
/// an empty table.
pub fn build_from_frequencies(freqs: &FrequencyTable) -> HuffmanBuild {
    let mut tree = HuffmanTree::default();
    let mut snapshots = Vec::new();

    if freqs.is_empty() {
        return HuffmanBuild { snapshots, tree };
    }

    let mut active: BTreeSet<(u64, NodeId)> = BTreeSet::new();
    for row in freqs.iter() {
        let id = tree.push(row.count, NodeKind::Leaf { symbol: row.symbol });
        active.insert((row.count, id));
    }

    snapshots.push(HuffmanSnapshot {
        active_nodes: tree.nodes.iter().map(HuffmanNode::summary).collect(),
        description: "Initial nodes".to_string(),
        merged_pair: None,
        merged_node_id: None,
    });

    while active.len() > 1 {
        let (Some((weight_a, a)), Some((weight_b, b))) = (active.pop_first(), active.pop_first())
        else {
            break;
        };

        let weight = weight_a + weight_b;
        let merged = tree.push(weight, NodeKind::Internal { left: a, right: b });

        let mut active_nodes: Vec<NodeSummary> =
            active.iter().map(|&(_, id)| tree.nodes[id].summary()).collect();
        active_nodes.push(tree.nodes[merged].summary());
        active.insert((weight, merged));

        let description = format!(
            "Merged ({}) + ({}) => {}",
            tree.nodes[a].label(),
            tree.nodes[b].label(),
            weight
        );
        debug!(left = a, right = b, merged, weight, "huffman merge");

        snapshots.push(HuffmanSnapshot {
            active_nodes,
            description,
            merged_pair: Some((a, b)),
            merged_node_id: Some(merged),
        });
    }

    tree.root = active.first().map(|&(_, id)| id);
    debug!(
        symbols = freqs.len(),
        nodes = tree.len(),
        snapshots = snapshots.len(),
        "huffman tree built"
    );

    HuffmanBuild { snapshots, tree }
}

/// Mapping from symbol to its binary code string.
///
/// # Invariants
/// - every code is non-empty and made of `'0'` / `'1'`
/// - no code is a prefix of another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, String>,
}

impl CodeTable {
    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.codes.iter().map(|(&s, c)| (s, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Check that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut sorted: Vec<&str> = self.codes.values().map(String::as_str).collect();
        sorted.sort_unstable();
        // After sorting, a prefix sits immediately before some string it prefixes.
        sorted.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Σ frequency × code length over the symbols in `freqs`.
    ///
    /// Symbols missing from the table contribute nothing.
    pub fn weighted_bits(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .iter()
            .filter_map(|row| self.get(row.symbol).map(|code| row.count * code.len() as u64))
            .sum()
    }

    /// Write the code of every input symbol, in order.
    ///
    /// # Errors
    /// `HuffmanError::SymbolNotInTable` if a symbol has no code.
    pub fn pack(&self, input: &[u8]) -> Result<PackedBits> {
        let mut writer = BitWriter::new();
        for &symbol in input {
            let code = self
                .get(symbol)
                .ok_or(HuffmanError::SymbolNotInTable { symbol })?;
            writer.write_code(code);
        }
        Ok(writer.finish())
    }
}

impl Serialize for CodeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.codes.iter().map(|(&s, c)| (symbol_text(s), c)))
    }
}

/// Assign a code to every leaf: `0` for a left edge, `1` for a right edge.
pub fn generate_codes(tree: &HuffmanTree) -> CodeTable {
    let mut codes = BTreeMap::new();

    let Some(root) = tree.root() else {
        return CodeTable { codes };
    };

    if let NodeKind::Leaf { symbol } = root.kind {
        codes.insert(symbol, "0".to_string());
        return CodeTable { codes };
    }

    // Depth-first, left before right
    let mut stack = vec![(root.id, String::new())];
    while let Some((id, path)) = stack.pop() {
        match tree.nodes[id].kind {
            NodeKind::Leaf { symbol } => {
                codes.insert(symbol, path);
            }
            NodeKind::Internal { left, right } => {
                stack.push((right, format!("{path}1")));
                stack.push((left, format!("{path}0")));
            }
        }
    }

    CodeTable { codes }
}

/// Total compressed size in bits for the data `freqs` was counted from.
///
/// Returns 0 for an empty tree or table.
pub fn huffman_compressed_bits(tree: &HuffmanTree, freqs: &FrequencyTable) -> u64 {
    if tree.is_empty() || freqs.is_empty() {
        return 0;
    }
    generate_codes(tree).weighted_bits(freqs)
}
