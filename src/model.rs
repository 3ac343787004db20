//! Core data model: identifiers, element handles, and property values.
//!
//! Every externally visible identifier in vireo is a 64-bit composite
//! packing a type id into the high 32 bits and a type-local id into the low
//! 32 bits. [`ElementId`] owns that encoding; nothing else in the crate
//! shifts bits by hand.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable small-integer identifier of a vertex or edge type.
///
/// Assigned from a single counter shared by both kinds, so a type id is
/// unique across the whole graph and never reused while the graph lives.
pub type TypeId = u32;

/// Identifier of an element within its owning type.
///
/// Local ids start at 1, are unique only within one type, and are recycled
/// after the element is removed.
pub type LocalId = u32;

/// Index of a property descriptor in the graph-global descriptor array.
pub type PropertyId = usize;

/// Globally unique 64-bit composite identifier: `(type_id << 32) | local_id`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Packs a type id and a type-local id into one composite identifier.
    pub fn new(type_id: TypeId, local_id: LocalId) -> Self {
        Self((u64::from(type_id) << 32) | u64::from(local_id))
    }

    /// The owning type's id (high 32 bits).
    pub fn type_id(self) -> TypeId {
        (self.0 >> 32) as u32
    }

    /// The type-local id (low 32 bits).
    pub fn local_id(self) -> LocalId {
        self.0 as u32
    }

    /// The raw 64-bit encoding.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Reinterprets a raw 64-bit value as a composite identifier.
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_id(), self.local_id())
    }
}

/// Lightweight handle identifying a vertex.
///
/// Handles are plain identity, not storage: all state lives in the
/// [`Graph`](crate::Graph), which every operation takes explicitly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Vertex(pub ElementId);

impl Vertex {
    /// Builds a handle from a type id and local id.
    pub fn new(type_id: TypeId, local_id: LocalId) -> Self {
        Self(ElementId::new(type_id, local_id))
    }

    /// The composite identifier.
    pub fn id(self) -> ElementId {
        self.0
    }

    /// The owning vertex type's id.
    pub fn type_id(self) -> TypeId {
        self.0.type_id()
    }

    /// The id local to the owning vertex type.
    pub fn local_id(self) -> LocalId {
        self.0.local_id()
    }
}

/// Lightweight handle identifying an edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Edge(pub ElementId);

impl Edge {
    /// Builds a handle from a type id and local id.
    pub fn new(type_id: TypeId, local_id: LocalId) -> Self {
        Self(ElementId::new(type_id, local_id))
    }

    /// The composite identifier.
    pub fn id(self) -> ElementId {
        self.0
    }

    /// The owning edge type's id.
    pub fn type_id(self) -> TypeId {
        self.0.type_id()
    }

    /// The id local to the owning edge type.
    pub fn local_id(self) -> LocalId {
        self.0.local_id()
    }
}

/// Whether an element handle refers to a vertex type or an edge type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Vertex,
    Edge,
}

/// Packed adjacency entry: `(edge_local_id << 32) | peer_local_id`.
///
/// Stored in the directional adjacency index buckets. The peer's *type* is
/// the bucket key one level up, so the entry itself only needs the two
/// local ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EdgePeer(u64);

impl EdgePeer {
    /// Packs an edge local id and a peer-vertex local id.
    pub fn new(edge_id: LocalId, peer_id: LocalId) -> Self {
        Self((u64::from(edge_id) << 32) | u64::from(peer_id))
    }

    /// The edge's local id (high 32 bits).
    pub fn edge_id(self) -> LocalId {
        (self.0 >> 32) as u32
    }

    /// The peer vertex's local id (low 32 bits).
    pub fn peer_id(self) -> LocalId {
        self.0 as u32
    }
}

/// Direction of edge traversal relative to a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Follow edges where the vertex is the tail.
    Out,
    /// Follow edges where the vertex is the head.
    In,
    /// Union of both directions.
    Both,
}

/// Declared data type of a property.
///
/// Only totally ordered types are supported, because property values double
/// as keys in the value index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int,
    String,
}

/// Indexing strategy of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Multi-valued index: one value maps to a set of elements.
    Indexed,
    /// Unique index: one value maps to at most one element.
    Unique,
}

/// A property value.
///
/// The variant order gives a total order across data types, so mixed-type
/// values still sort deterministically in a value index.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl PropertyValue {
    /// The declared data type this value satisfies.
    pub fn data_type(&self) -> DataType {
        match self {
            PropertyValue::Bool(_) => DataType::Bool,
            PropertyValue::Int(_) => DataType::Int,
            PropertyValue::String(_) => DataType::String,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::String(s) => write!(f, "{s}"),
        }
    }
}

/// An ordered set of element identifiers with set algebra.
///
/// Query operations that return collections of vertices or edges return
/// `Elements`, so results compose: neighbors of two vertices can be
/// unioned, intersected, or differenced without re-querying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elements(BTreeSet<ElementId>);

impl Elements {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds an element. Returns false if it was already present.
    pub fn add(&mut self, id: ElementId) -> bool {
        self.0.insert(id)
    }

    /// Removes an element. Returns false if it was not present.
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.0.remove(&id)
    }

    /// Whether the element is in the set.
    pub fn contains(&self, id: ElementId) -> bool {
        self.0.contains(&id)
    }

    /// Some element of the set, if any.
    pub fn any(&self) -> Option<ElementId> {
        self.0.iter().next().copied()
    }

    /// Adds every element of `other` to this set; returns the new size.
    pub fn union(&mut self, other: &Elements) -> usize {
        self.0.extend(other.0.iter().copied());
        self.0.len()
    }

    /// Keeps only elements present in both sets; returns the new size.
    pub fn intersect(&mut self, other: &Elements) -> usize {
        self.0.retain(|id| other.0.contains(id));
        self.0.len()
    }

    /// Removes every element of `other` from this set; returns the new size.
    pub fn difference(&mut self, other: &Elements) -> usize {
        self.0.retain(|id| !other.0.contains(id));
        self.0.len()
    }

    /// Whether this set is a superset of `other`.
    pub fn contains_all(&self, other: &Elements) -> bool {
        self.0.is_superset(&other.0)
    }

    /// Iterates the elements in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ElementId> for Elements {
    fn from_iter<I: IntoIterator<Item = ElementId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Elements {
    type Item = ElementId;
    type IntoIter = std::collections::btree_set::IntoIter<ElementId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
