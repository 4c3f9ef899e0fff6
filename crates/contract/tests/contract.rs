use formwork_contract::prelude::*;
use formwork_contract::{ContractState, PropertyFlags};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn album() -> Arc<Schema> {
    let mut album = ContractBuilder::new("album");
    album.property("title", PropertyOptions::new()).expect("title");
    album
        .property_with("hit", PropertyOptions::new(), |hit| {
            hit.property("title", PropertyOptions::new())?;
            hit.property("rating", PropertyOptions::new().coercion(Coercion::Integer))?;
            hit.validates(&["title", "rating"], Rule::Presence)?;
            Ok(())
        })
        .expect("hit");
    album
        .collection_with("songs", PropertyOptions::new(), |song| {
            song.property("title", PropertyOptions::new())?;
            song.validates(&["title"], Rule::Presence)?;
            Ok(())
        })
        .expect("songs");
    album.build().expect("album schema")
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// One message per path.
fn messages(pairs: &[(&str, &str)]) -> BTreeMap<String, Vec<String>> {
    pairs.iter().map(|(path, message)| ((*path).to_owned(), vec![(*message).to_owned()])).collect()
}

#[test]
fn empty_nested_model_reports_dotted_paths() {
    let model = json!({ "title": "Blue", "hit": { "title": null, "rating": null }, "songs": [] });
    let mut form = Contract::new(album(), &model);

    assert_eq!(form.state(), ContractState::Constructed);
    assert!(!form.validate(&Map::new()));
    assert_eq!(form.state(), ContractState::Invalid);
    assert_eq!(
        form.errors().messages(),
        messages(&[("hit.title", "can't be blank"), ("hit.rating", "can't be blank")])
    );

    let hit = form.nested("hit").expect("hit form");
    assert_eq!(hit.get("title").expect("title"), Value::Null);
    assert_eq!(hit.get("rating").expect("rating"), Value::Null);
}

#[test]
fn nested_input_fills_nested_form() {
    let model = json!({ "title": "Blue", "hit": { "title": null, "rating": null } });
    let mut form = Contract::new(album(), &model);

    assert!(form.validate(&object(json!({ "hit": { "title": "LA Drone", "rating": 10 } }))));
    assert_eq!(form.state(), ContractState::Valid);
    assert!(form.errors().is_empty());

    let hit = form.nested("hit").expect("hit form");
    assert_eq!(hit.get("title").expect("title"), json!("LA Drone"));
    assert_eq!(hit.get("rating").expect("rating"), json!(10));
    assert_eq!(form.get("hit").expect("hit"), json!({ "title": "LA Drone", "rating": 10 }));
}

#[test]
fn errors_are_rebuilt_on_every_validate() {
    let model = json!({ "hit": { "title": null, "rating": null } });
    let mut form = Contract::new(album(), &model);

    assert!(!form.validate(&Map::new()));
    assert!(!form.validate(&Map::new()));
    assert_eq!(form.errors().get("hit.title").map(<[String]>::len), Some(1));

    assert!(form.validate(&object(json!({ "hit": { "title": "Roxanne", "rating": "7" } }))));
    assert!(form.errors().is_empty());
}

#[test]
fn missing_nested_form_is_created_from_input() {
    let model = json!({ "title": "Blue" });
    let mut form = Contract::new(album(), &model);

    assert!(form.nested("hit").is_none());
    assert!(form.validate(&Map::new()));

    assert!(!form.validate(&object(json!({ "hit": { "title": "Roxanne" } }))));
    assert_eq!(form.errors().paths().collect::<Vec<_>>(), ["hit.rating"]);
    assert!(form.nested("hit").is_some());
}

#[test]
fn nested_collections_merge_errors_once() {
    let model = json!({ "songs": [{ "title": "Roxanne" }] });
    let mut form = Contract::new(album(), &model);

    let input = json!({ "songs": [{ "title": "Roxanne" }, { "title": "" }, { "title": null }] });
    assert!(!form.validate(&object(input)));

    assert_eq!(form.nested_collection("songs").map(<[Contract]>::len), Some(3));
    assert_eq!(form.errors().messages(), messages(&[("songs.title", "can't be blank")]));

    assert!(form.validate(&object(json!({ "songs": [{ "title": "Message in a Bottle" }] }))));
    assert_eq!(form.nested_collection("songs").map(<[Contract]>::len), Some(1));
}

#[test]
fn coercion_failures_become_field_errors() {
    let model = json!({ "hit": { "title": "Roxanne", "rating": 3 } });
    let mut form = Contract::new(album(), &model);

    assert!(!form.validate(&object(json!({ "hit": { "rating": "ten" } }))));
    assert_eq!(form.errors().messages(), messages(&[("hit.rating", "is not a valid integer")]));

    let hit = form.nested("hit").expect("hit form");
    assert_eq!(hit.get("rating").expect("rating"), json!("ten"));
    assert_eq!(hit.get("title").expect("title"), json!("Roxanne"));
}

#[test]
fn private_names_map_model_attributes() {
    let mut builder = ContractBuilder::new("artist");
    builder.property("title", PropertyOptions::new().as_name("name")).expect("title");
    let schema = builder.build().expect("artist schema");

    let mut model = json!({ "name": "Sting" });
    let mut form = Contract::new(Arc::clone(&schema), &model);
    assert_eq!(form.get("title").expect("title"), json!("Sting"));

    assert!(form.validate(&object(json!({ "title": "Gordon" }))));
    assert_eq!(form.to_nested_hash(), object(json!({ "title": "Gordon" })));

    form.sync(&mut model);
    assert_eq!(model, json!({ "name": "Gordon" }));

    assert!(form.validate(&object(json!({ "name": "Sumner" }))));
    assert_eq!(form.get("title").expect("title"), json!("Sumner"));
}

#[test]
fn sync_writes_back_nested_values() {
    let mut model = json!({ "title": "Blue", "hit": { "title": null, "rating": null, "length": 212 } });
    let mut form = Contract::new(album(), &model);

    assert!(form.validate(&object(json!({ "title": "Ghost", "hit": { "title": "Spirits", "rating": "9" } }))));
    form.sync(&mut model);

    assert_eq!(
        model,
        json!({ "title": "Ghost", "hit": { "title": "Spirits", "rating": 9, "length": 212 } })
    );
}

#[test]
fn save_syncs_before_persisting() {
    let mut model = json!({ "title": "Blue" });
    let mut form = Contract::new(album(), &model);
    assert!(form.validate(&object(json!({ "title": "Zenyatta" }))));

    let persisted = form.save(&mut model, |model, hash| {
        assert_eq!(model["title"], json!("Zenyatta"));
        hash
    });

    assert_eq!(persisted.get("title"), Some(&json!("Zenyatta")));
}

#[test]
fn accessors_read_and_write_the_field_store() {
    let model = json!({ "title": "Blue", "hit": { "title": "Roxanne", "rating": 5 } });
    let mut form = Contract::new(album(), &model);

    form.set("title", "Outlandos").expect("set title");
    assert_eq!(form.get("title").expect("title"), json!("Outlandos"));
    assert_eq!(model["title"], json!("Blue"));

    form.nested_mut("hit").expect("hit").set("rating", 8).expect("set rating");
    assert_eq!(form.get("hit").expect("hit")["rating"], json!(8));

    assert!(matches!(form.get("artist"), Err(ContractError::UnknownProperty { .. })));
    assert!(matches!(form.set("hit", json!({})), Err(ContractError::TypeMismatch { .. })));

    form.set("hit", Value::Null).expect("clear hit");
    assert!(form.nested("hit").is_none());
}

#[test]
fn custom_validators_see_the_whole_contract() {
    let mut builder = ContractBuilder::new("album");
    builder
        .properties(&["title", "artist"], &PropertyOptions::new())
        .expect("properties")
        .validate_with(CustomValidator::new("distinct", |contract: &Contract, errors: &mut Errors| {
            if contract.get("title").ok() == contract.get("artist").ok() {
                errors.add("title", "must differ from artist");
            }
        }))
        .validate_with(CustomValidator::new("distinct", |_: &Contract, errors: &mut Errors| {
            errors.add("title", "never registered");
        }));
    let schema = builder.build().expect("schema");
    assert_eq!(schema.validators().len(), 1);

    let mut form = Contract::new(schema, &json!({ "title": "Police", "artist": "Police" }));
    assert!(!form.validate(&Map::new()));
    assert_eq!(form.errors().full_messages(), ["title must differ from artist"]);
}

#[test]
fn rules_other_than_presence_skip_null() {
    let mut builder = ContractBuilder::new("album");
    builder.property("year", PropertyOptions::new().coercion(Coercion::Integer)).expect("year");
    builder
        .validates(&["year"], Rule::Numericality { min: Some(1900.0), max: None, only_integer: true })
        .expect("rule");
    let schema = builder.build().expect("schema");

    let mut form = Contract::new(schema, &json!({}));
    assert!(form.validate(&object(json!({ "year": "" }))));
    assert!(!form.validate(&object(json!({ "year": "1850" }))));
    assert_eq!(
        form.errors().messages(),
        messages(&[("year", "must be greater than or equal to 1900")])
    );
}

#[test]
fn features_normalize_input() {
    let mut builder = ContractBuilder::new("album");
    builder.feature(Arc::new(Strip)).expect("strip");
    builder.feature(Arc::new(NullifyBlank)).expect("nullify");
    builder.property("title", PropertyOptions::new()).expect("title");
    builder.validates(&["title"], Rule::Presence).expect("presence");
    let schema = builder.build().expect("schema");

    let mut form = Contract::new(schema, &json!({}));
    assert!(form.validate(&object(json!({ "title": "  Synchronicity " }))));
    assert_eq!(form.get("title").expect("title"), json!("Synchronicity"));

    assert!(!form.validate(&object(json!({ "title": "   " }))));
    assert_eq!(form.get("title").expect("title"), Value::Null);
}

#[test]
fn form_option_reuses_built_schema() {
    let mut song = ContractBuilder::new("song");
    song.property("title", PropertyOptions::new()).expect("title");
    song.validates(&["title"], Rule::Length { min: Some(2), max: None }).expect("length");
    let song = song.build().expect("song schema");

    let mut album = ContractBuilder::new("album");
    album.property("single", PropertyOptions::new().form(Arc::clone(&song))).expect("single");
    album.collection("tracks", PropertyOptions::new().form(song)).expect("tracks");
    let schema = album.build().expect("album schema");

    assert_eq!(
        schema.property("tracks").map(|p| p.flags()),
        Some(PropertyFlags::FORM | PropertyFlags::COLLECTION)
    );

    let mut form = Contract::new(schema, &json!({ "single": { "title": "X" }, "tracks": [] }));
    assert!(!form.validate(&object(json!({ "tracks": [{ "title": "Y" }] }))));
    assert_eq!(
        form.errors().paths().collect::<Vec<_>>(),
        ["single.title", "tracks.title"]
    );
}

#[test]
fn non_object_nested_input_is_invalid() {
    let model = json!({ "hit": { "title": "Roxanne", "rating": 5 } });
    let mut form = Contract::new(album(), &model);

    assert!(!form.validate(&object(json!({ "hit": "Roxanne", "songs": 3 }))));
    assert_eq!(
        form.errors().messages(),
        messages(&[("hit", "is invalid"), ("songs", "is invalid")])
    );
    assert!(form.nested("hit").is_some());
}

#[test]
fn sync_leaves_absent_and_null_collections_alone() {
    for model in [json!({ "title": "Blue" }), json!({ "title": "Blue", "songs": null })] {
        let form = Contract::new(album(), &model);

        let mut synced = model.clone();
        form.sync(&mut synced);
        assert_eq!(synced, model);
    }

    let mut model = json!({ "songs": null });
    let mut form = Contract::new(album(), &model);
    assert!(form.validate(&object(json!({ "songs": [{ "title": "Roxanne" }] }))));
    form.sync(&mut model);
    assert_eq!(model, json!({ "songs": [{ "title": "Roxanne" }] }));
}

#[test]
fn failed_coercion_stays_reported_until_overwritten() {
    let model = json!({ "hit": { "title": "Roxanne", "rating": 3 } });
    let mut form = Contract::new(album(), &model);

    assert!(!form.validate(&object(json!({ "hit": { "rating": "ten" } }))));
    assert!(!form.revalidate());
    assert_eq!(form.state(), ContractState::Invalid);
    assert!(!form.validate(&Map::new()));
    assert_eq!(form.errors().messages(), messages(&[("hit.rating", "is not a valid integer")]));

    form.nested_mut("hit").expect("hit form").set("rating", 4).expect("rating");
    assert!(form.revalidate());

    assert!(!form.validate(&object(json!({ "hit": { "rating": "ten" } }))));
    assert!(form.validate(&object(json!({ "hit": { "rating": "10" } }))));
    assert_eq!(form.nested("hit").and_then(|hit| hit.get("rating").ok()), Some(json!(10)));
}

#[test]
fn error_paths_follow_declaration_order() {
    let mut album = ContractBuilder::new("album");
    album
        .property_with("hit", PropertyOptions::new(), |hit| {
            hit.property("title", PropertyOptions::new())?;
            hit.validates(&["title"], Rule::Presence)?;
            Ok(())
        })
        .expect("hit");
    album.property("title", PropertyOptions::new()).expect("title");
    album.property("year", PropertyOptions::new().coercion(Coercion::Integer)).expect("year");
    album.validates(&["title"], Rule::Presence).expect("presence");
    let schema = album.build().expect("album schema");

    let mut form = Contract::new(schema, &json!({ "hit": { "title": "Roxanne" } }));
    let input = json!({ "year": "soon", "title": "", "hit": { "title": "" } });
    assert!(!form.validate(&object(input)));

    assert_eq!(form.errors().paths().collect::<Vec<_>>(), ["hit.title", "title", "year"]);
    assert!(!form.revalidate());
    assert_eq!(form.errors().paths().collect::<Vec<_>>(), ["hit.title", "title", "year"]);
}
