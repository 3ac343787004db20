//! The graph registry: schema forest, global property array, and the
//! policy/metrics state every operation consults.
//!
//! Types are create-only: a type id, once assigned, is never reused for the
//! lifetime of the graph. Vertex and edge types draw ids from one shared
//! counter, which is what makes composite element ids globally unique.
//! Property descriptors live in a single graph-wide array so any property
//! resolves from a bare integer; dropped slots are reused lowest-first.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::config::Config;
use crate::db::core::adjacency::AdjacencyStrategy;
use crate::db::core::property::{Property, PropertySlot};
use crate::db::core::schema::{EdgeTypeRecord, VertexTypeRecord};
use crate::db::metrics::PerformanceMetrics;
use crate::error::{GraphError, Result};
use crate::model::{DataType, ElementId, ElementKind, PropertyId, PropertyKind, TypeId};

/// Endpoint declaration of a restricted edge type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRestriction {
    pub tail_type: TypeId,
    pub head_type: TypeId,
}

/// An embedded typed property graph.
///
/// One `Graph` owns its entire schema and element state. Mutations take
/// `&mut self` and must be serialized by the caller; reads take `&self`
/// and may run concurrently with each other.
#[derive(Debug)]
pub struct Graph {
    pub(crate) config: Config,
    pub(crate) metrics: PerformanceMetrics,
    next_type_id: TypeId,
    pub(crate) vertex_types: BTreeMap<TypeId, VertexTypeRecord>,
    pub(crate) edge_types: BTreeMap<TypeId, EdgeTypeRecord>,
    vertex_names: HashMap<String, TypeId>,
    edge_names: HashMap<String, TypeId>,
    pub(crate) properties: Vec<PropertySlot>,
}

impl Graph {
    /// Creates an empty graph with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty graph with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            metrics: PerformanceMetrics::default(),
            next_type_id: 1,
            vertex_types: BTreeMap::new(),
            edge_types: BTreeMap::new(),
            vertex_names: HashMap::new(),
            edge_names: HashMap::new(),
            properties: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    // ------------------------------------------------------------------
    // Schema: type creation
    // ------------------------------------------------------------------

    /// Declares a vertex type. Idempotent by name: re-declaring an existing
    /// name returns its id unchanged.
    pub fn new_vertex_type(&mut self, name: &str) -> Result<TypeId> {
        if let Some(id) = self.vertex_names.get(name) {
            return Ok(*id);
        }
        let id = self.take_type_id()?;
        self.vertex_types
            .insert(id, VertexTypeRecord::new(name, None));
        self.vertex_names.insert(name.to_string(), id);
        info!(type_id = id, name, "created vertex type");
        Ok(id)
    }

    /// Declares a vertex type as a subtype of `base`. Idempotent by name.
    pub fn new_vertex_subtype(&mut self, name: &str, base: TypeId) -> Result<TypeId> {
        if let Some(id) = self.vertex_names.get(name) {
            return Ok(*id);
        }
        self.vertex_type(base)?;
        let id = self.take_type_id()?;
        self.vertex_types
            .insert(id, VertexTypeRecord::new(name, Some(base)));
        self.vertex_names.insert(name.to_string(), id);
        self.vertex_type_mut(base)?.subtypes.push(id);
        info!(type_id = id, name, base, "created vertex subtype");
        Ok(id)
    }

    /// Declares an unrestricted edge type. `directed` fixes the adjacency
    /// strategy for the type's lifetime: directed types are indexed from
    /// both endpoints, undirected types answer traversals by scanning.
    /// Idempotent by name.
    pub fn new_edge_type(&mut self, name: &str, directed: bool) -> Result<TypeId> {
        if let Some(id) = self.edge_names.get(name) {
            return Ok(*id);
        }
        let id = self.take_type_id()?;
        self.edge_types
            .insert(id, EdgeTypeRecord::new(name, directed, None));
        self.edge_names.insert(name.to_string(), id);
        info!(type_id = id, name, directed, "created edge type");
        Ok(id)
    }

    /// Declares an edge type whose endpoints are fixed to exact vertex
    /// types, enabling the packed edge-record encoding. Idempotent by name.
    pub fn new_restricted_edge_type(
        &mut self,
        name: &str,
        directed: bool,
        restriction: EndpointRestriction,
    ) -> Result<TypeId> {
        if let Some(id) = self.edge_names.get(name) {
            return Ok(*id);
        }
        self.vertex_type(restriction.tail_type)?;
        self.vertex_type(restriction.head_type)?;
        let id = self.take_type_id()?;
        self.edge_types.insert(
            id,
            EdgeTypeRecord::new_restricted(
                name,
                directed,
                restriction.tail_type,
                restriction.head_type,
                None,
            ),
        );
        self.edge_names.insert(name.to_string(), id);
        info!(
            type_id = id,
            name,
            directed,
            tail_type = restriction.tail_type,
            head_type = restriction.head_type,
            "created restricted edge type"
        );
        Ok(id)
    }

    /// Declares an edge type as a subtype of `base`. The subtype is
    /// unrestricted and carries its own directedness. Idempotent by name.
    pub fn new_edge_subtype(&mut self, name: &str, directed: bool, base: TypeId) -> Result<TypeId> {
        if let Some(id) = self.edge_names.get(name) {
            return Ok(*id);
        }
        self.edge_type(base)?;
        let id = self.take_type_id()?;
        self.edge_types
            .insert(id, EdgeTypeRecord::new(name, directed, Some(base)));
        self.edge_names.insert(name.to_string(), id);
        self.edge_type_mut(base)?.subtypes.push(id);
        info!(type_id = id, name, base, "created edge subtype");
        Ok(id)
    }

    fn take_type_id(&mut self) -> Result<TypeId> {
        let id = self.next_type_id;
        self.next_type_id = self
            .next_type_id
            .checked_add(1)
            .ok_or(GraphError::AllocatorExhausted)?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Schema: properties
    // ------------------------------------------------------------------

    /// Declares a property on `owner` (a vertex or edge type). Idempotent
    /// by name within the owning type. The returned id indexes the
    /// graph-global descriptor array; freed slots are reused lowest-first.
    pub fn new_property(
        &mut self,
        owner: TypeId,
        name: &str,
        data_type: DataType,
        kind: PropertyKind,
    ) -> Result<PropertyId> {
        if let Some(id) = self.type_property_map(owner)?.get(name) {
            return Ok(*id);
        }

        let property = Property::new(owner, name, data_type, kind);
        let slot = self
            .properties
            .iter()
            .position(|s| matches!(s, PropertySlot::Free));
        let id = match slot {
            Some(id) => {
                self.properties[id] = PropertySlot::Occupied(property);
                id
            }
            None => {
                self.properties.push(PropertySlot::Occupied(property));
                self.properties.len() - 1
            }
        };
        self.type_property_map_mut(owner)?
            .insert(name.to_string(), id);
        debug!(property = id, owner, name, ?data_type, ?kind, "declared property");
        Ok(id)
    }

    /// Drops a property: every stored value and its index go away, the
    /// name is unlinked from the owning type, and the slot becomes free
    /// for a later declaration.
    pub fn drop_property(&mut self, property: PropertyId) -> Result<()> {
        let (owner, name) = {
            let prop = self.property_descriptor(property)?;
            (prop.owner, prop.name.clone())
        };
        self.type_property_map_mut(owner)?.remove(&name);
        self.properties[property] = PropertySlot::Free;
        debug!(property, owner, name, "dropped property");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Schema: lookup and introspection
    // ------------------------------------------------------------------

    /// Resolves a vertex type by name.
    pub fn find_vertex_type(&self, name: &str) -> Result<TypeId> {
        self.vertex_names
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::TypeNotFound(name.to_string()))
    }

    /// Resolves an edge type by name.
    pub fn find_edge_type(&self, name: &str) -> Result<TypeId> {
        self.edge_names
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::TypeNotFound(name.to_string()))
    }

    /// Resolves a property by name on the exact type that declared it.
    /// Properties are not inherited: a subtype does not see its base's
    /// declarations because local ids collide across types.
    pub fn find_property(&self, owner: TypeId, name: &str) -> Result<PropertyId> {
        self.type_property_map(owner)?
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::PropertyNotFound(name.to_string()))
    }

    /// The declared name of a vertex or edge type.
    pub fn type_name(&self, type_id: TypeId) -> Result<&str> {
        if let Some(record) = self.vertex_types.get(&type_id) {
            return Ok(&record.name);
        }
        if let Some(record) = self.edge_types.get(&type_id) {
            return Ok(&record.name);
        }
        Err(GraphError::TypeNotFound(format!("type id {type_id}")))
    }

    /// Whether an element id names a vertex or an edge, judged by its
    /// type-id half.
    pub fn element_kind(&self, element: ElementId) -> Result<ElementKind> {
        let type_id = element.type_id();
        if self.vertex_types.contains_key(&type_id) {
            Ok(ElementKind::Vertex)
        } else if self.edge_types.contains_key(&type_id) {
            Ok(ElementKind::Edge)
        } else {
            Err(GraphError::TypeNotFound(format!("type id {type_id}")))
        }
    }

    /// Whether `edge_type`'s edges carry direction.
    pub fn edge_type_is_directed(&self, edge_type: TypeId) -> Result<bool> {
        Ok(self.edge_type(edge_type)?.directed)
    }

    /// The adjacency strategy `edge_type` was created with.
    pub fn adjacency_strategy(&self, edge_type: TypeId) -> Result<AdjacencyStrategy> {
        Ok(self.edge_type(edge_type)?.strategy)
    }

    /// The endpoint restriction of `edge_type`, if it has one.
    pub fn edge_type_restriction(&self, edge_type: TypeId) -> Result<Option<EndpointRestriction>> {
        Ok(self
            .edge_type(edge_type)?
            .store
            .restriction()
            .map(|(tail_type, head_type)| EndpointRestriction {
                tail_type,
                head_type,
            }))
    }

    /// The base of `type_id` in the type forest, if it is a subtype.
    pub fn base_type(&self, type_id: TypeId) -> Result<Option<TypeId>> {
        if let Some(record) = self.vertex_types.get(&type_id) {
            return Ok(record.base);
        }
        if let Some(record) = self.edge_types.get(&type_id) {
            return Ok(record.base);
        }
        Err(GraphError::TypeNotFound(format!("type id {type_id}")))
    }

    /// The direct subtypes of `type_id`, in declaration order.
    pub fn subtypes(&self, type_id: TypeId) -> Result<&[TypeId]> {
        if let Some(record) = self.vertex_types.get(&type_id) {
            return Ok(&record.subtypes);
        }
        if let Some(record) = self.edge_types.get(&type_id) {
            return Ok(&record.subtypes);
        }
        Err(GraphError::TypeNotFound(format!("type id {type_id}")))
    }

    pub fn vertex_type_count(&self) -> usize {
        self.vertex_types.len()
    }

    pub fn edge_type_count(&self) -> usize {
        self.edge_types.len()
    }

    /// Live vertices across every vertex type.
    pub fn vertex_count(&self) -> usize {
        self.vertex_types.values().map(|t| t.allocator.len()).sum()
    }

    /// Live edges across every edge type.
    pub fn edge_count(&self) -> usize {
        self.edge_types.values().map(|t| t.store.len()).sum()
    }

    // ------------------------------------------------------------------
    // Internal accessors
    // ------------------------------------------------------------------

    pub(crate) fn vertex_type(&self, type_id: TypeId) -> Result<&VertexTypeRecord> {
        self.vertex_types
            .get(&type_id)
            .ok_or_else(|| GraphError::TypeNotFound(format!("vertex type id {type_id}")))
    }

    pub(crate) fn vertex_type_mut(&mut self, type_id: TypeId) -> Result<&mut VertexTypeRecord> {
        self.vertex_types
            .get_mut(&type_id)
            .ok_or_else(|| GraphError::TypeNotFound(format!("vertex type id {type_id}")))
    }

    pub(crate) fn edge_type(&self, type_id: TypeId) -> Result<&EdgeTypeRecord> {
        self.edge_types
            .get(&type_id)
            .ok_or_else(|| GraphError::TypeNotFound(format!("edge type id {type_id}")))
    }

    pub(crate) fn edge_type_mut(&mut self, type_id: TypeId) -> Result<&mut EdgeTypeRecord> {
        self.edge_types
            .get_mut(&type_id)
            .ok_or_else(|| GraphError::TypeNotFound(format!("edge type id {type_id}")))
    }

    pub(crate) fn property_descriptor(&self, property: PropertyId) -> Result<&Property> {
        match self.properties.get(property) {
            Some(PropertySlot::Occupied(prop)) => Ok(prop),
            _ => Err(GraphError::PropertyNotFound(format!(
                "property id {property}"
            ))),
        }
    }

    pub(crate) fn property_descriptor_mut(&mut self, property: PropertyId) -> Result<&mut Property> {
        match self.properties.get_mut(property) {
            Some(PropertySlot::Occupied(prop)) => Ok(prop),
            _ => Err(GraphError::PropertyNotFound(format!(
                "property id {property}"
            ))),
        }
    }

    /// Whether `element` names a live vertex or edge. Errors only if its
    /// type-id half names no type at all.
    pub(crate) fn element_exists(&self, element: ElementId) -> Result<bool> {
        let type_id = element.type_id();
        if let Some(record) = self.vertex_types.get(&type_id) {
            return Ok(record.contains(element.local_id()));
        }
        if let Some(record) = self.edge_types.get(&type_id) {
            return Ok(record.contains(element.local_id()));
        }
        Err(GraphError::TypeNotFound(format!("type id {type_id}")))
    }

    fn type_property_map(&self, owner: TypeId) -> Result<&HashMap<String, PropertyId>> {
        if let Some(record) = self.vertex_types.get(&owner) {
            return Ok(&record.properties);
        }
        if let Some(record) = self.edge_types.get(&owner) {
            return Ok(&record.properties);
        }
        Err(GraphError::TypeNotFound(format!("type id {owner}")))
    }

    fn type_property_map_mut(&mut self, owner: TypeId) -> Result<&mut HashMap<String, PropertyId>> {
        if let Some(record) = self.vertex_types.get_mut(&owner) {
            return Ok(&mut record.properties);
        }
        if let Some(record) = self.edge_types.get_mut(&owner) {
            return Ok(&mut record.properties);
        }
        Err(GraphError::TypeNotFound(format!("type id {owner}")))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_ids_come_from_one_counter() {
        let mut g = Graph::new();
        let person = g.new_vertex_type("person").unwrap();
        let knows = g.new_edge_type("knows", true).unwrap();
        let city = g.new_vertex_type("city").unwrap();
        assert_eq!(person, 1);
        assert_eq!(knows, 2);
        assert_eq!(city, 3);
    }

    #[test]
    fn type_creation_is_idempotent_by_name() {
        let mut g = Graph::new();
        let a = g.new_vertex_type("person").unwrap();
        let b = g.new_vertex_type("person").unwrap();
        assert_eq!(a, b);
        assert_eq!(g.vertex_type_count(), 1);
    }

    #[test]
    fn property_slots_are_reused_lowest_first() {
        let mut g = Graph::new();
        let person = g.new_vertex_type("person").unwrap();
        let name = g
            .new_property(person, "name", DataType::String, PropertyKind::Indexed)
            .unwrap();
        let age = g
            .new_property(person, "age", DataType::Int, PropertyKind::Indexed)
            .unwrap();
        assert_eq!((name, age), (0, 1));

        g.drop_property(name).unwrap();
        assert!(g.find_property(person, "name").is_err());

        let nick = g
            .new_property(person, "nick", DataType::String, PropertyKind::Indexed)
            .unwrap();
        assert_eq!(nick, name);
    }

    #[test]
    fn find_property_is_not_polymorphic() {
        let mut g = Graph::new();
        let base = g.new_vertex_type("animal").unwrap();
        let sub = g.new_vertex_subtype("dog", base).unwrap();
        g.new_property(base, "name", DataType::String, PropertyKind::Indexed)
            .unwrap();
        assert!(g.find_property(sub, "name").is_err());
    }

    #[test]
    fn unknown_type_lookups_fail() {
        let g = Graph::new();
        assert!(matches!(
            g.find_vertex_type("ghost"),
            Err(GraphError::TypeNotFound(_))
        ));
        assert!(g.type_name(42).is_err());
    }
}
