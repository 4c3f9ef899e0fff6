use formwork_contract::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn names(schema: &Schema) -> Vec<&str> {
    schema.properties().iter().map(|p| p.name()).collect()
}

fn nested<'a>(schema: &'a Schema, name: &str) -> &'a Schema {
    schema.property(name).and_then(|p| p.nested()).expect("nested schema")
}

fn parent() -> Arc<Schema> {
    let mut album = ContractBuilder::new("album");
    album.property("title", PropertyOptions::new()).expect("title");
    album
        .property_with("hit", PropertyOptions::new(), |hit| {
            hit.property("title", PropertyOptions::new()).map(|_| ())
        })
        .expect("hit");
    album.build().expect("parent schema")
}

#[test]
fn derived_schemas_are_independent_copies() {
    let parent = parent();

    let mut child = parent.extend("live_album");
    child.property("venue", PropertyOptions::new()).expect("venue");
    child
        .property_with("hit", PropertyOptions::new().inherit(true), |hit| {
            hit.property("rating", PropertyOptions::new()).map(|_| ())
        })
        .expect("inherited hit");
    let child = child.build().expect("child schema");

    let sibling = parent.extend("best_of").build().expect("sibling schema");

    assert_eq!(names(&parent), ["title", "hit"]);
    assert_eq!(names(nested(&parent, "hit")), ["title"]);

    assert_eq!(names(&child), ["title", "hit", "venue"]);
    assert_eq!(names(nested(&child, "hit")), ["title", "rating"]);

    assert_eq!(names(&sibling), ["title", "hit"]);
    assert_eq!(names(nested(&sibling, "hit")), ["title"]);
}

#[test]
fn redeclaring_without_inherit_replaces_nested_schema() {
    let mut child = parent().extend("live_album");
    child
        .property_with("hit", PropertyOptions::new(), |hit| {
            hit.property("rating", PropertyOptions::new()).map(|_| ())
        })
        .expect("hit");
    let child = child.build().expect("child schema");

    assert_eq!(names(nested(&child, "hit")), ["rating"]);
}

#[test]
fn inherit_extends_a_block_of_the_same_builder() {
    let mut album = ContractBuilder::new("album");
    album
        .property_with("hit", PropertyOptions::new(), |hit| {
            hit.property("title", PropertyOptions::new()).map(|_| ())
        })
        .expect("hit");
    album
        .property_with("hit", PropertyOptions::new().inherit(true), |hit| {
            hit.property("length", PropertyOptions::new()).map(|_| ())
        })
        .expect("inherited hit");
    let album = album.build().expect("schema");

    assert_eq!(names(nested(&album, "hit")), ["title", "length"]);
}

#[test]
fn reserved_names_leave_schema_untouched() {
    let mut album = parent().extend("album");

    for reserved in ["model", "aliased_model", "aliasedModel", "fields", "mapper"] {
        let err = album.property(reserved, PropertyOptions::new()).expect_err("reserved");
        assert!(matches!(err, ConfigError::ReservedName { .. }));
        assert!(err.to_string().contains("is reserved"));
    }
    assert!(album.property_with("mapper", PropertyOptions::new(), |_| Ok(())).is_err());

    assert_eq!(album.property_names().collect::<Vec<_>>(), ["title", "hit"]);
}

#[test]
fn features_propagate_only_into_later_blocks() {
    let mut album = ContractBuilder::new("album");
    album.feature(Arc::new(Strip)).expect("strip");
    album
        .property_with("hit", PropertyOptions::new(), |hit| {
            hit.property("title", PropertyOptions::new()).map(|_| ())
        })
        .expect("hit");
    album.feature(Arc::new(NullifyBlank)).expect("nullify");
    album
        .collection_with("songs", PropertyOptions::new(), |song| {
            song.property("title", PropertyOptions::new()).map(|_| ())
        })
        .expect("songs");
    let album = album.build().expect("schema");

    assert_eq!(album.features().names(), ["strip", "nullify_blank"]);
    assert_eq!(album.property("hit").map(|p| p.features().to_vec()), Some(vec!["strip"]));
    assert_eq!(nested(&album, "hit").features().names(), ["strip"]);
    assert_eq!(nested(&album, "songs").features().names(), ["strip", "nullify_blank"]);

    let mut form = Contract::new(album, &json!({}));
    let input = json!({ "hit": { "title": "   " }, "songs": [{ "title": "   " }] });
    assert!(form.validate(input.as_object().expect("object")));

    let hash = form.to_nested_hash();
    assert_eq!(hash["hit"], json!({ "title": "" }));
    assert_eq!(hash["songs"], json!([{ "title": null }]));
}

#[test]
fn inherited_features_reach_new_blocks() {
    let mut base = ContractBuilder::new("base");
    base.feature(Arc::new(Strip)).expect("strip");
    let base = base.build().expect("base");

    let mut album = base.extend("album");
    album
        .property_with("cover", PropertyOptions::new(), |cover| {
            cover.property("url", PropertyOptions::new()).map(|_| ())
        })
        .expect("cover");
    let album = album.build().expect("album");

    assert!(nested(&album, "cover").features().contains("strip"));
    assert!(!base.properties().iter().any(|p| p.name() == "cover"));
}

#[test]
fn fragments_included_twice_do_not_repeat_rules() {
    let mut fragment = ContractBuilder::new("credits");
    fragment.property("artist", PropertyOptions::new()).expect("artist");
    fragment.validates(&["artist"], Rule::Presence).expect("presence");
    fragment.feature(Arc::new(Strip)).expect("strip");
    let fragment = fragment.build().expect("fragment");

    let mut parent = ContractBuilder::new("album");
    parent.include(&fragment).property("title", PropertyOptions::new()).expect("title");
    let parent = parent.build().expect("parent");

    let mut child = parent.extend("single");
    child.include(&fragment).include(&fragment);
    let child = child.build().expect("child");

    assert_eq!(names(&child), ["artist", "title"]);
    assert_eq!(child.validators().len(), 1);
    assert_eq!(child.features().names(), ["strip"]);

    let mut form = Contract::new(child, &json!({}));
    assert!(!form.validate(&Map::new()));
    assert_eq!(form.errors().full_messages(), ["artist can't be blank"]);
}

#[test]
fn accessor_overrides_stack_across_derivation() {
    let upper = |_: &Contract, value: Value| match value.as_str() {
        Some(s) => Value::String(s.to_uppercase()),
        None => value,
    };
    let suffix = |tail: &'static str| {
        move |_: &Contract, value: Value| match value.as_str() {
            Some(s) => Value::String(format!("{s}{tail}")),
            None => value,
        }
    };

    let mut parent = ContractBuilder::new("album");
    parent.property("title", PropertyOptions::new()).expect("title");
    parent
        .override_accessor("title", AccessorOverride::new().reader(upper).writer(suffix("-p")))
        .expect("parent override");
    let parent = parent.build().expect("parent");

    let mut child = parent.extend("single");
    child
        .override_accessor(
            "title",
            AccessorOverride::new().reader(suffix("!")).writer(suffix("-c")),
        )
        .expect("child override");
    let child = child.build().expect("child");

    assert_eq!(parent.accessors().get("title").map(|a| a.depth()), Some(1));
    assert_eq!(child.accessors().get("title").map(|a| a.depth()), Some(2));

    let mut form = Contract::new(child, &json!({ "title": "x" }));
    assert_eq!(form.get("title").expect("title"), json!("X!"));

    form.set("title", "y").expect("set");
    assert_eq!(form.fields().value("title"), Some(&json!("y-c-p")));
    assert_eq!(form.get("title").expect("title"), json!("Y-C-P!"));

    let form = Contract::new(parent, &json!({ "title": "x" }));
    assert_eq!(form.get("title").expect("title"), json!("X"));
}
