//! Property descriptors and their value stores.
//!
//! A property is declared on exactly one type and lives in the graph-global
//! descriptor array; its element→value map and value→element index are kept
//! in lockstep by every mutation. Values are totally ordered, which is what
//! lets them double as index keys.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::db::core::graph::Graph;
use crate::error::{GraphError, Result};
use crate::model::{
    DataType, ElementId, Elements, LocalId, PropertyId, PropertyKind, PropertyValue, TypeId,
};

/// A declared property: descriptor plus backing store.
#[derive(Debug, Clone)]
pub(crate) struct Property {
    pub owner: TypeId,
    pub name: String,
    pub data_type: DataType,
    pub kind: PropertyKind,
    pub store: PropertyStore,
}

impl Property {
    pub fn new(owner: TypeId, name: &str, data_type: DataType, kind: PropertyKind) -> Self {
        Self {
            owner,
            name: name.to_string(),
            data_type,
            kind,
            store: PropertyStore::new(kind),
        }
    }
}

/// Slot in the graph-global property array. Freed slots are reused by the
/// next declaration, lowest index first.
#[derive(Debug, Clone)]
pub(crate) enum PropertySlot {
    Occupied(Property),
    Free,
}

/// Element→value map plus the value→element index matching the property's
/// kind.
#[derive(Debug, Clone)]
pub(crate) struct PropertyStore {
    values: BTreeMap<LocalId, PropertyValue>,
    index: ValueIndex,
}

#[derive(Debug, Clone)]
enum ValueIndex {
    Multi(BTreeMap<PropertyValue, BTreeSet<LocalId>>),
    Unique(BTreeMap<PropertyValue, LocalId>),
}

impl PropertyStore {
    fn new(kind: PropertyKind) -> Self {
        let index = match kind {
            PropertyKind::Indexed => ValueIndex::Multi(BTreeMap::new()),
            PropertyKind::Unique => ValueIndex::Unique(BTreeMap::new()),
        };
        Self {
            values: BTreeMap::new(),
            index,
        }
    }

    /// Stores `value` for `element`, replacing and de-indexing any previous
    /// value first so the index never holds stale entries.
    ///
    /// With `enforce_unique`, a `Unique` index that already maps `value` to
    /// a different element rejects the write before anything is touched.
    pub fn set(
        &mut self,
        element: LocalId,
        value: PropertyValue,
        enforce_unique: bool,
        property_name: &str,
    ) -> Result<Option<PropertyValue>> {
        if enforce_unique {
            if let ValueIndex::Unique(index) = &self.index {
                if let Some(&holder) = index.get(&value) {
                    if holder != element {
                        return Err(GraphError::UniqueViolation {
                            property: property_name.to_string(),
                        });
                    }
                }
            }
        }

        let previous = self.values.insert(element, value.clone());
        if let Some(old) = &previous {
            self.unindex(element, old);
        }
        match &mut self.index {
            ValueIndex::Multi(index) => {
                index.entry(value).or_default().insert(element);
            }
            ValueIndex::Unique(index) => {
                index.insert(value, element);
            }
        }
        Ok(previous)
    }

    /// The value stored for `element`, if any.
    pub fn get(&self, element: LocalId) -> Option<&PropertyValue> {
        self.values.get(&element)
    }

    /// Pops the value stored for `element`, removing its index entry and
    /// pruning an emptied bucket.
    pub fn remove(&mut self, element: LocalId) -> Option<PropertyValue> {
        let value = self.values.remove(&element)?;
        self.unindex(element, &value);
        Some(value)
    }

    /// First element holding `value`, if any.
    pub fn find_first(&self, value: &PropertyValue) -> Option<LocalId> {
        match &self.index {
            ValueIndex::Multi(index) => index.get(value)?.iter().next().copied(),
            ValueIndex::Unique(index) => index.get(value).copied(),
        }
    }

    /// Every element holding `value`, in ascending local-id order.
    pub fn find_all(&self, value: &PropertyValue) -> Vec<LocalId> {
        match &self.index {
            ValueIndex::Multi(index) => index
                .get(value)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
            ValueIndex::Unique(index) => index.get(value).copied().into_iter().collect(),
        }
    }

    fn unindex(&mut self, element: LocalId, value: &PropertyValue) {
        match &mut self.index {
            ValueIndex::Multi(index) => {
                if let Some(set) = index.get_mut(value) {
                    set.remove(&element);
                    if set.is_empty() {
                        index.remove(value);
                    }
                }
            }
            ValueIndex::Unique(index) => {
                // Only drop the index entry if it still points at this
                // element; an unchecked duplicate write may have repointed
                // it at another holder.
                if index.get(value) == Some(&element) {
                    index.remove(value);
                }
            }
        }
    }
}

impl Graph {
    /// Sets `property` on `element`.
    ///
    /// The element must exist, belong to the property's owner type, and
    /// supply a value of the declared data type.
    pub fn set_property(
        &mut self,
        element: ElementId,
        property: PropertyId,
        value: PropertyValue,
    ) -> Result<()> {
        self.check_property_target(element, property)?;
        let prop = self.property_descriptor(property)?;
        if value.data_type() != prop.data_type {
            return Err(GraphError::InvalidArgument(format!(
                "property {:?} expects {:?}, got {:?}",
                prop.name,
                prop.data_type,
                value.data_type()
            )));
        }

        let enforce = self.config.enforce_unique;
        let prop = self.property_descriptor_mut(property)?;
        let name = prop.name.clone();
        prop.store
            .set(element.local_id(), value, enforce, &name)?;
        Ok(())
    }

    /// The value of `property` on `element`, if set.
    pub fn get_property(
        &self,
        element: ElementId,
        property: PropertyId,
    ) -> Result<Option<PropertyValue>> {
        self.check_property_target(element, property)?;
        let prop = self.property_descriptor(property)?;
        Ok(prop.store.get(element.local_id()).cloned())
    }

    /// Removes `property` from `element`, returning the previous value.
    pub fn remove_property(
        &mut self,
        element: ElementId,
        property: PropertyId,
    ) -> Result<Option<PropertyValue>> {
        self.check_property_target(element, property)?;
        let prop = self.property_descriptor_mut(property)?;
        let removed = prop.store.remove(element.local_id());
        if removed.is_some() {
            debug!(element = %element, property, "removed property value");
        }
        Ok(removed)
    }

    /// First element holding `value` on `property`: the single holder for a
    /// `Unique` property, or the lowest-id holder for an `Indexed` one.
    pub fn find_element_by_value(
        &self,
        property: PropertyId,
        value: &PropertyValue,
    ) -> Result<Option<ElementId>> {
        let prop = self.property_descriptor(property)?;
        if self.config.collect_metrics {
            crate::PerformanceMetrics::bump(&self.metrics.index_hits, 1);
        }
        Ok(prop
            .store
            .find_first(value)
            .map(|local| ElementId::new(prop.owner, local)))
    }

    /// Every element holding `value` on `property`.
    pub fn find_elements_by_value(
        &self,
        property: PropertyId,
        value: &PropertyValue,
    ) -> Result<Elements> {
        let prop = self.property_descriptor(property)?;
        if self.config.collect_metrics {
            crate::PerformanceMetrics::bump(&self.metrics.index_hits, 1);
        }
        Ok(prop
            .store
            .find_all(value)
            .into_iter()
            .map(|local| ElementId::new(prop.owner, local))
            .collect())
    }

    /// The type that declared `property`.
    pub fn property_owner(&self, property: PropertyId) -> Result<TypeId> {
        Ok(self.property_descriptor(property)?.owner)
    }

    /// The declared name of `property`.
    pub fn property_name(&self, property: PropertyId) -> Result<&str> {
        Ok(&self.property_descriptor(property)?.name)
    }

    /// The declared indexing kind of `property`.
    pub fn property_kind(&self, property: PropertyId) -> Result<PropertyKind> {
        Ok(self.property_descriptor(property)?.kind)
    }

    /// The declared data type of `property`.
    pub fn property_data_type(&self, property: PropertyId) -> Result<DataType> {
        Ok(self.property_descriptor(property)?.data_type)
    }

    /// Validates that `element` exists and is an element of the property's
    /// owner type. Local ids are only unique within one type, so a property
    /// store never accepts elements of any other type, subtypes included.
    fn check_property_target(&self, element: ElementId, property: PropertyId) -> Result<()> {
        let prop = self.property_descriptor(property)?;
        if prop.owner != element.type_id() {
            return Err(GraphError::InvalidArgument(format!(
                "property {:?} is declared on type {}, not type {}",
                prop.name,
                prop.owner,
                element.type_id()
            )));
        }
        if !self.element_exists(element)? {
            return Err(GraphError::ElementNotFound("element"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_round_trip() {
        let mut store = PropertyStore::new(PropertyKind::Indexed);
        assert!(store
            .set(3, PropertyValue::Int(42), true, "age")
            .unwrap()
            .is_none());
        assert_eq!(store.get(3), Some(&PropertyValue::Int(42)));
        assert_eq!(store.remove(3), Some(PropertyValue::Int(42)));
        assert_eq!(store.get(3), None);
        assert_eq!(store.find_all(&PropertyValue::Int(42)), Vec::<LocalId>::new());
    }

    #[test]
    fn indexed_lookup_tracks_membership() {
        let mut store = PropertyStore::new(PropertyKind::Indexed);
        store.set(1, PropertyValue::from("blue"), true, "color").unwrap();
        store.set(2, PropertyValue::from("blue"), true, "color").unwrap();
        store.set(3, PropertyValue::from("red"), true, "color").unwrap();

        assert_eq!(store.find_all(&PropertyValue::from("blue")), vec![1, 2]);
        assert_eq!(store.find_first(&PropertyValue::from("red")), Some(3));

        store.remove(1);
        assert_eq!(store.find_all(&PropertyValue::from("blue")), vec![2]);
    }

    #[test]
    fn overwrite_deindexes_old_value() {
        let mut store = PropertyStore::new(PropertyKind::Indexed);
        store.set(1, PropertyValue::Int(1), true, "n").unwrap();
        let old = store.set(1, PropertyValue::Int(2), true, "n").unwrap();
        assert_eq!(old, Some(PropertyValue::Int(1)));
        assert!(store.find_all(&PropertyValue::Int(1)).is_empty());
        assert_eq!(store.find_all(&PropertyValue::Int(2)), vec![1]);
    }

    #[test]
    fn unique_rejects_duplicate_when_enforced() {
        let mut store = PropertyStore::new(PropertyKind::Unique);
        store.set(1, PropertyValue::from("ssn-1"), true, "ssn").unwrap();

        let err = store
            .set(2, PropertyValue::from("ssn-1"), true, "ssn")
            .unwrap_err();
        assert!(matches!(err, GraphError::UniqueViolation { .. }));
        // First mapping survives the rejected write.
        assert_eq!(store.find_first(&PropertyValue::from("ssn-1")), Some(1));

        // Re-setting the same element to its own value is not a violation.
        store.set(1, PropertyValue::from("ssn-1"), true, "ssn").unwrap();
    }

    #[test]
    fn unique_overwrites_when_not_enforced() {
        let mut store = PropertyStore::new(PropertyKind::Unique);
        store.set(1, PropertyValue::from("x"), false, "code").unwrap();
        store.set(2, PropertyValue::from("x"), false, "code").unwrap();
        // The index points at the newest writer; the first element still
        // holds the value in its value map.
        assert_eq!(store.find_first(&PropertyValue::from("x")), Some(2));
        assert_eq!(store.get(1), Some(&PropertyValue::from("x")));

        // Removing the stale holder must not disturb the index entry.
        store.remove(1);
        assert_eq!(store.find_first(&PropertyValue::from("x")), Some(2));
    }
}
