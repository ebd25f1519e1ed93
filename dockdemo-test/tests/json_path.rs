use dockdemo_test::{resolve_path, tokenize_path, PathToken};
use serde_json::{json, Value};

#[test]
fn tokenizes_fields_indices_and_len() {
    assert_eq!(
        tokenize_path("users[1].tags[0].len()"),
        vec![
            PathToken::Field("users".into()),
            PathToken::Index(1),
            PathToken::Field("tags".into()),
            PathToken::Index(0),
            PathToken::Len,
        ]
    );
}

#[test]
fn resolves_nested_field() {
    let v = json!({"user": {"name": "Bob"}});
    assert_eq!(resolve_path(&v, "user.name"), json!("Bob"));
}

#[test]
fn resolves_top_level_array_index() {
    let v = json!([{"id": 1}, {"id": 2}]);
    assert_eq!(resolve_path(&v, "[1].id"), json!(2));
}

#[test]
fn resolves_len_of_array_object_and_string() {
    let v = json!({"items": [1, 2, 3], "meta": {"a": 1}, "name": "Zoë"});
    assert_eq!(resolve_path(&v, "items.len()"), json!(3));
    assert_eq!(resolve_path(&v, "meta.size()"), json!(1));
    assert_eq!(resolve_path(&v, "name.len()"), json!(3));
}

#[test]
fn missing_segments_resolve_to_null() {
    let v = json!({"name": "Alice", "list": []});
    assert_eq!(resolve_path(&v, "missing"), Value::Null);
    assert_eq!(resolve_path(&v, "list[4]"), Value::Null);
    assert_eq!(resolve_path(&v, "missing.deeper"), Value::Null);
}

#[test]
#[should_panic(expected = "unclosed bracket")]
fn unclosed_bracket_panics() {
    tokenize_path("users[0");
}

#[test]
#[should_panic(expected = "len() applied to non-collection")]
fn len_of_number_panics() {
    resolve_path(&json!({"n": 5}), "n.len()");
}
