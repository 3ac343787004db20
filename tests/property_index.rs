use vireo::{
    Config, DataType, Graph, GraphError, PropertyKind, PropertyValue, Result, Vertex,
};

#[test]
fn indexed_lookup_finds_every_holder() -> Result<()> {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person")?;
    let city = g.new_property(person, "city", DataType::String, PropertyKind::Indexed)?;

    let a = g.new_vertex(person)?;
    let b = g.new_vertex(person)?;
    let c = g.new_vertex(person)?;
    g.set_property(a.id(), city, PropertyValue::from("Oslo"))?;
    g.set_property(b.id(), city, PropertyValue::from("Oslo"))?;
    g.set_property(c.id(), city, PropertyValue::from("Bergen"))?;

    let in_oslo = g.find_elements_by_value(city, &PropertyValue::from("Oslo"))?;
    assert_eq!(in_oslo.len(), 2);
    assert!(in_oslo.contains(a.id()));
    assert!(in_oslo.contains(b.id()));

    let first = g.find_element_by_value(city, &PropertyValue::from("Oslo"))?;
    assert_eq!(first, Some(a.id()), "lowest local id wins");

    assert!(g
        .find_elements_by_value(city, &PropertyValue::from("Troms\u{f8}"))?
        .is_empty());
    Ok(())
}

#[test]
fn removal_unindexes_the_value() -> Result<()> {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person")?;
    let city = g.new_property(person, "city", DataType::String, PropertyKind::Indexed)?;
    let a = g.new_vertex(person)?;
    g.set_property(a.id(), city, PropertyValue::from("Oslo"))?;

    g.remove_property(a.id(), city)?;
    assert!(g
        .find_elements_by_value(city, &PropertyValue::from("Oslo"))?
        .is_empty());
    Ok(())
}

#[test]
fn unique_property_rejects_a_second_holder() -> Result<()> {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person")?;
    let email = g.new_property(person, "email", DataType::String, PropertyKind::Unique)?;
    let a = g.new_vertex(person)?;
    let b = g.new_vertex(person)?;

    g.set_property(a.id(), email, PropertyValue::from("ada@example.org"))?;
    let err = g
        .set_property(b.id(), email, PropertyValue::from("ada@example.org"))
        .unwrap_err();
    assert!(matches!(err, GraphError::UniqueViolation { .. }));

    // The first mapping survives and the loser holds nothing.
    assert_eq!(
        g.find_element_by_value(email, &PropertyValue::from("ada@example.org"))?,
        Some(a.id())
    );
    assert_eq!(g.get_property(b.id(), email)?, None);

    // Re-setting the holder to its own value is not a violation.
    g.set_property(a.id(), email, PropertyValue::from("ada@example.org"))?;
    Ok(())
}

#[test]
fn permissive_config_reverts_to_index_overwrite() -> Result<()> {
    let mut g = Graph::with_config(Config::permissive());
    let person = g.new_vertex_type("person")?;
    let email = g.new_property(person, "email", DataType::String, PropertyKind::Unique)?;
    let a = g.new_vertex(person)?;
    let b = g.new_vertex(person)?;

    g.set_property(a.id(), email, PropertyValue::from("x@example.org"))?;
    g.set_property(b.id(), email, PropertyValue::from("x@example.org"))?;

    // The index now points at the later writer.
    assert_eq!(
        g.find_element_by_value(email, &PropertyValue::from("x@example.org"))?,
        Some(b.id())
    );
    Ok(())
}

#[test]
fn unique_holder_change_frees_the_old_value() -> Result<()> {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person")?;
    let email = g.new_property(person, "email", DataType::String, PropertyKind::Unique)?;
    let a = g.new_vertex(person)?;
    let b = g.new_vertex(person)?;

    g.set_property(a.id(), email, PropertyValue::from("old@example.org"))?;
    g.set_property(a.id(), email, PropertyValue::from("new@example.org"))?;

    // The old value is free for another element now.
    g.set_property(b.id(), email, PropertyValue::from("old@example.org"))?;
    assert_eq!(
        g.find_element_by_value(email, &PropertyValue::from("old@example.org"))?,
        Some(b.id())
    );
    Ok(())
}

#[test]
fn edge_properties_index_like_vertex_properties() -> Result<()> {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person")?;
    let knows = g.new_edge_type("knows", true)?;
    let since = g.new_property(knows, "since", DataType::Int, PropertyKind::Indexed)?;

    let a = g.new_vertex(person)?;
    let b = g.new_vertex(person)?;
    let c = g.new_vertex(person)?;
    let ab = g.new_edge(knows, a, b)?;
    let ac = g.new_edge(knows, a, c)?;
    g.set_property(ab.id(), since, 1999i64.into())?;
    g.set_property(ac.id(), since, 2004i64.into())?;

    assert_eq!(
        g.find_element_by_value(since, &1999i64.into())?,
        Some(ab.id())
    );
    Ok(())
}

#[test]
fn model_types_round_trip_through_serde() -> Result<()> {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person")?;
    let v = g.new_vertex(person)?;

    let json = serde_json::to_string(&v).expect("serialize");
    let back: Vertex = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, v);

    let value = PropertyValue::from("Ada");
    let json = serde_json::to_string(&value).expect("serialize");
    let back: PropertyValue = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, value);
    Ok(())
}
