use attrkit::{Kind, Model, Mutators};
use serde_json::{json, Map, Value};

struct Stub;
impl Kind for Stub {}

/// Greets with some surprise on the way in and adds a title on the way out.
struct Mutating;

impl Kind for Mutating {
    fn mutators(mutators: &mut Mutators<Self>) {
        mutators
            .set("greeting", |model, value| {
                let greeting = format!("Oh! {}", value.as_str().unwrap_or_default());
                model.set_raw_attribute("greeting", Value::String(greeting));
            })
            .get("name", |_, value| match value {
                Value::String(name) => Value::String(format!("Mr. {}", name)),
                other => other,
            });
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn attribute_manipulation() {
    let mut model = Model::<Stub>::default();
    assert_eq!(model.get_attribute("title"), Value::Null);

    model.set_attribute("title", json!("Mademoiselle"));
    assert_eq!(model.get_attribute("title"), json!("Mademoiselle"));
    assert_eq!(model.get_attributes(), &object(json!({"title": "Mademoiselle"})));
}

#[test]
fn attribute_mutation() {
    let mut model = Model::<Mutating>::default();
    assert!(model.has_set_mutator("greeting"));
    assert!(model.has_get_mutator("name"));
    assert!(!model.has_get_mutator("greeting"));

    model.set_attribute("greeting", json!("Hello there!"));
    assert_eq!(model.get_attribute("greeting"), json!("Oh! Hello there!"));

    model.set_attribute("name", json!("Aidan"));
    assert_eq!(model.get_attribute("name"), json!("Mr. Aidan"));
    assert_eq!(model.get_attributes().get("name"), Some(&json!("Aidan")));
}

#[test]
fn mutators_are_found_by_studly_key() {
    let model = Model::<Mutating>::default();
    assert!(model.has_get_mutator("Name"));
    assert!(model.has_set_mutator("Greeting"));
    assert!(!model.has_set_mutator("GREETING"));
}

#[test]
fn fill_goes_through_set_mutators() {
    let mut model = Model::<Mutating>::default();
    model.fill(object(json!({"greeting": "Hi"}))).unwrap();
    assert_eq!(model.get_attributes(), &object(json!({"greeting": "Oh! Hi"})));
}

#[test]
fn set_raw_attributes_bypasses_mutation() {
    let mut model = Model::<Mutating>::default();
    model.set_raw_attributes(object(json!({"greeting": "Hello there!"})), false);
    assert_ne!(model.get_attribute("greeting"), json!("Oh! Hello there!"));
    assert_eq!(model.get_attribute("greeting"), json!("Hello there!"));
}

#[test]
fn only() {
    let mut model = Model::<Stub>::default();
    model
        .set_attribute("name", json!("Aidan"))
        .set_attribute("occupation", json!("Lead Developer"))
        .set_attribute("location", json!("VS Code"));

    assert_eq!(
        model.only(&["name", "location"]),
        object(json!({"name": "Aidan", "location": "VS Code"}))
    );
    assert_eq!(
        model.only(&["name", "occupation"]),
        object(json!({"name": "Aidan", "occupation": "Lead Developer"}))
    );
    // missing keys are reported, not skipped
    assert_eq!(model.only(&["name", "age"]), object(json!({"name": "Aidan", "age": null})));
}

#[test]
fn only_applies_get_mutators() {
    let mut model = Model::<Mutating>::default();
    model.set_attribute("name", json!("Aidan"));
    assert_eq!(model.only(&["name"]), object(json!({"name": "Mr. Aidan"})));
}

#[test]
fn attributes_to_array_returns_visible_attributes() {
    let mut model = Model::<Stub>::default();
    model.set_visible(["name", "email"]);
    model
        .set_attribute("name", json!("Aidan"))
        .set_attribute("email", json!("aidan@example.com"))
        .set_attribute("password", json!("Test123"));

    assert_eq!(
        model.attributes_to_array(),
        object(json!({"name": "Aidan", "email": "aidan@example.com"}))
    );
}

#[test]
fn attributes_to_array_does_not_return_hidden_attributes() {
    let mut model = Model::<Stub>::default();
    model.set_hidden(["password"]);
    model
        .set_attribute("name", json!("Aidan"))
        .set_attribute("email", json!("aidan@example.com"))
        .set_attribute("password", json!("Test123"));

    assert_eq!(
        model.attributes_to_array(),
        object(json!({"name": "Aidan", "email": "aidan@example.com"}))
    );
}

#[test]
fn keeping_track_of_changes() {
    let mut model = Model::<Stub>::default();
    assert!(!model.has_changes(&Map::new(), &[]));

    model.set_raw_attributes(
        object(json!({
            "name": "Aidan",
            "occupation": "Lead Developer",
            "project": "models",
        })),
        true,
    );
    model.sync_changes();

    assert!(model.is_clean(&["name", "occupation", "project"]));
    assert!(model.is_clean(&["name", "occupation"]));
    assert!(model.is_clean(&["name"]));
    assert!(!model.is_dirty(&["name", "occupation", "project"]));
    assert!(!model.is_dirty(&["name"]));
    assert!(!model.was_changed(&["name", "occupation", "project"]));

    model.set_attribute("name", json!("Bob"));
    model.sync_changes();

    assert!(model.is_dirty(&["name"]));
    assert!(!model.is_clean(&["name"]));
    assert!(model.was_changed(&["name"]));
    assert_ne!(model.get_original("name"), model.get_attribute("name"));
    assert_ne!(&model.original(), model.get_attributes());
    assert!(model.is_clean(&["occupation", "project"]));
    assert!(!model.is_dirty(&["occupation", "project"]));
    assert_eq!(model.get_dirty(), object(json!({"name": "Bob"})));
    assert_eq!(model.get_changes(), &object(json!({"name": "Bob"})));
}

#[test]
fn numeric_strings_are_not_dirty() {
    let mut model = Model::<Stub>::default();
    model.set_raw_attributes(object(json!({"count": 1, "code": 1})), true);
    model.set_attribute("count", json!("1")).set_attribute("code", json!("01"));
    assert!(model.is_clean(&["count"]));
    assert!(model.is_dirty(&["code"]));
}

#[test]
fn reordering_a_nested_object_makes_it_dirty() {
    let mut model = Model::<Stub>::default();
    model.set_raw_attributes(object(json!({"meta": {"a": 1, "b": 2}})), true);
    let before = model.to_string();

    model.set("meta", json!({"b": 2, "a": 1}));
    assert_ne!(model.to_string(), before);
    assert!(model.is_dirty(&["meta"]));
    assert_eq!(model.get_dirty(), object(json!({"meta": {"b": 2, "a": 1}})));
}

#[test]
fn float_noise_is_not_dirty() {
    let mut model = Model::<Stub>::default();
    let total: f64 = 0.1 + 0.2;
    model.set_raw_attributes(object(json!({"total": total})), true);
    model.set("total", json!("0.3"));
    assert!(model.is_clean(&["total"]));
}

#[test]
fn new_keys_are_dirty() {
    let mut model = Model::<Stub>::default();
    model.sync_original();
    model.set_attribute("name", json!("Aidan"));
    assert!(model.is_dirty(&[]));
    assert!(!model.original_is_equivalent("name"));
}

#[test]
fn original_values_go_through_get_mutators() {
    let mut model = Model::<Mutating>::default();
    model.set_raw_attributes(object(json!({"name": "Aidan", "greeting": "Hi"})), true);
    model.set_attribute("name", json!("Bob"));

    assert_eq!(model.get_original("name"), json!("Mr. Aidan"));
    assert_eq!(model.get_raw_original_or("name", Value::Null), json!("Aidan"));
    assert_eq!(model.original(), object(json!({"name": "Mr. Aidan", "greeting": "Hi"})));
    assert_eq!(model.get_raw_original(), &object(json!({"name": "Aidan", "greeting": "Hi"})));
}

#[test]
fn original_defaults() {
    let mut model = Model::<Mutating>::default();
    model.set_raw_attributes(object(json!({"title": null})), true);

    assert_eq!(model.get_original("missing"), Value::Null);
    assert_eq!(model.get_original_or("title", json!("Sir")), json!("Sir"));
    assert_eq!(model.get_raw_original_or("missing", json!(0)), json!(0));
    // the default is mutated like any stored value
    assert_eq!(model.get_original_or("name", json!("Nobody")), json!("Mr. Nobody"));
}

#[test]
fn targeted_original_sync() {
    let mut model = Model::<Stub>::default();
    model.set_raw_attributes(object(json!({"name": "Aidan", "project": "models"})), true);
    model.set_attribute("name", json!("Bob")).set_attribute("project", json!("engines"));

    model.sync_original_attribute("name");
    assert!(model.is_clean(&["name"]));
    assert!(model.is_dirty(&["project"]));

    model.sync_original_attributes(&["project"]);
    assert!(model.is_clean(&[]));
}

#[test]
fn raw_attributes_round_trip() {
    let mut model = Model::<Stub>::default();
    model
        .set_attribute("b", json!(2))
        .set_attribute("a", json!({"nested": [1, 2, 3]}))
        .set_attribute("c", Value::Null);
    let attributes = model.get_attributes().clone();

    let mut copy = Model::<Stub>::default();
    copy.set_raw_attributes(attributes.clone(), false);
    assert_eq!(copy.get_attributes(), &attributes);
    assert_eq!(copy.to_string(), model.to_string());
    assert!(copy.get_raw_original().is_empty());
}
