//! Document Store Behavior Tests
//!
//! Covers the public call surface against both backends:
//! - create / persist / find round trip
//! - attribute merge on update
//! - delete is terminal and not idempotent
//! - search by type and exact attribute text
//! - key uniqueness

use docstore::storage::FileBackend;
use docstore::{
    AttributeFilter, Attributes, Document, DocumentState, DocumentStore, StoreError,
};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn bag(value: Value) -> Option<Attributes> {
    value.as_object().cloned()
}

fn keys(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.key()).collect()
}

/// Runs a scenario against a memory store and a file store.
fn for_each_backend(scenario: impl Fn(&mut DocumentStore)) {
    let mut memory = DocumentStore::in_memory();
    scenario(&mut memory);

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let backend = FileBackend::open(temp_dir.path(), true).unwrap();
    let mut file = DocumentStore::open(backend);
    scenario(&mut file);
    file.close().unwrap();
}

// =============================================================================
// Create
// =============================================================================

#[test]
fn test_generated_keys_are_fixed_length_hex_and_distinct() {
    for_each_backend(|store| {
        let mut a = store.create(None, "user", None);
        let mut b = store.create(None, "user", None);

        for doc in [&a, &b] {
            assert_eq!(doc.key().len(), 32);
            assert!(doc
                .key()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
        assert_ne!(a.key(), b.key());

        store.persist(&mut a).unwrap();
        store.persist(&mut b).unwrap();

        assert_eq!(store.find(a.key(), None).unwrap().unwrap().id(), a.id());
        assert_eq!(store.find(b.key(), None).unwrap().unwrap().id(), b.id());
    });
}

#[test]
fn test_empty_key_is_generated() {
    let store = DocumentStore::in_memory();
    let doc = store.create(Some(""), "user", None);
    assert_eq!(doc.key().len(), 32);
}

#[test]
fn test_absent_data_is_empty_bag() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("empty"), "thing", None);
        store.persist(&mut doc).unwrap();

        let found = store.find("empty", None).unwrap().unwrap();
        assert!(found.data().is_empty());
    });
}

// =============================================================================
// Persist + Find
// =============================================================================

#[test]
fn test_persist_then_find_round_trip() {
    for_each_backend(|store| {
        let data = json!({
            "email": "britone@example.com",
            "age": 41,
            "admin": false,
            "address": {"city": "Lisbon", "zip": "1000"},
            "tags": ["a", "b"]
        });
        let mut doc = store.create(Some("britone"), "person", bag(data.clone()));
        store.persist(&mut doc).unwrap();

        let found = store.find("britone", None).unwrap().unwrap();
        assert_eq!(found.key(), "britone");
        assert_eq!(found.doc_type(), "person");
        assert_eq!(Value::Object(found.data().clone()), data);
        assert_eq!(found.id(), doc.id());
        assert_eq!(found.state(), DocumentState::Persisted);
    });
}

#[test]
fn test_ids_increase() {
    for_each_backend(|store| {
        let mut a = store.create(Some("a"), "t", None);
        let mut b = store.create(Some("b"), "t", None);
        store.persist(&mut a).unwrap();
        store.persist(&mut b).unwrap();
        assert!(b.id().unwrap() > a.id().unwrap());
    });
}

#[test]
fn test_find_missing_is_none() {
    for_each_backend(|store| {
        assert!(store.find("nobody", None).unwrap().is_none());
        assert!(store.find("", None).unwrap().is_none());
    });
}

#[test]
fn test_find_type_filter_narrows_to_zero_or_one() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("alice"), "person", None);
        store.persist(&mut doc).unwrap();

        assert_eq!(
            store.find("alice", Some("person")).unwrap().unwrap().key(),
            "alice"
        );
        assert!(store.find("alice", Some("user")).unwrap().is_none());
    });
}

#[test]
fn test_duplicate_key_is_constraint_violation() {
    for_each_backend(|store| {
        let mut first = store.create(Some("alice"), "person", bag(json!({"n": 1})));
        store.persist(&mut first).unwrap();

        let mut second = store.create(Some("alice"), "person", bag(json!({"n": 2})));
        let err = store.persist(&mut second).unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation { ref key } if key == "alice"));

        // the original is untouched
        let found = store.find("alice", None).unwrap().unwrap();
        assert_eq!(found.get("n"), Some(&json!(1)));
        assert_eq!(store.count(), 1);
    });
}

// =============================================================================
// Update
// =============================================================================

#[test]
fn test_update_merges_and_is_durable_only_after_persist() {
    for_each_backend(|store| {
        let mut doc = store.create(
            Some("britone"),
            "person",
            bag(json!({"email": "britone@example.com", "role": "manager"})),
        );
        store.persist(&mut doc).unwrap();

        store
            .update(&mut doc, [("email", json!("britone@new-domain.com")), ("team", json!("core"))])
            .unwrap();

        // not persisted yet
        let before = store.find("britone", None).unwrap().unwrap();
        assert_eq!(before.get("email"), Some(&json!("britone@example.com")));

        store.persist(&mut doc).unwrap();

        let after = store.find("britone", None).unwrap().unwrap();
        assert_eq!(
            Value::Object(after.data().clone()),
            json!({"email": "britone@new-domain.com", "role": "manager", "team": "core"})
        );
        assert_eq!(after.id(), doc.id());
    });
}

#[test]
fn test_type_change_persists() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("alice"), "user", None);
        store.persist(&mut doc).unwrap();

        doc.set_type("person");
        store.persist(&mut doc).unwrap();

        assert!(store.find("alice", Some("user")).unwrap().is_none());
        assert!(store.find("alice", Some("person")).unwrap().is_some());
    });
}

#[test]
fn test_persist_stale_handle_after_delete_elsewhere() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("alice"), "person", None);
        store.persist(&mut doc).unwrap();

        let mut other = store.find("alice", None).unwrap().unwrap();
        store.delete(&mut other).unwrap();

        store.update(&mut doc, [("role", "manager")]).unwrap();
        let err = store.persist(&mut doc).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    });
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_is_terminal() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("alice"), "person", bag(json!({"role": "manager"})));
        store.persist(&mut doc).unwrap();

        store.delete(&mut doc).unwrap();
        assert_eq!(doc.state(), DocumentState::Deleted);
        assert!(store.find("alice", None).unwrap().is_none());
        assert!(store
            .search("person", &[AttributeFilter::eq("role", "manager")])
            .unwrap()
            .is_empty());

        let err = store.delete(&mut doc).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    });
}

#[test]
fn test_second_delete_through_fresh_handle_fails() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("alice"), "person", None);
        store.persist(&mut doc).unwrap();
        let mut stale = store.find("alice", None).unwrap().unwrap();

        store.delete(&mut doc).unwrap();
        let err = store.delete(&mut stale).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref key } if key == "alice"));
    });
}

#[test]
fn test_key_reusable_after_delete() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("alice"), "person", None);
        store.persist(&mut doc).unwrap();
        store.delete(&mut doc).unwrap();

        let mut again = store.create(Some("alice"), "person", None);
        store.persist(&mut again).unwrap();
        assert!(again.id().unwrap() > doc.id().unwrap());
    });
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_manager_scenario() {
    for_each_backend(|store| {
        let mut alice = store.create(Some("alice"), "user", bag(json!({"role": "manager"})));
        alice.set_type("person");
        store.persist(&mut alice).unwrap();

        let managers = store
            .search("person", &[AttributeFilter::eq("role", "manager")])
            .unwrap();
        assert_eq!(keys(&managers), vec!["alice"]);

        let engineers = store
            .search("person", &[AttributeFilter::eq("role", "engineer")])
            .unwrap();
        assert!(engineers.is_empty());
    });
}

#[test]
fn test_search_excludes_other_types_and_missing_attributes() {
    for_each_backend(|store| {
        let fixtures = [
            ("alice", "person", json!({"role": "manager"})),
            ("bob", "person", json!({"role": "engineer"})),
            ("carol", "person", json!({"name": "Carol"})),
            ("dave", "user", json!({"role": "manager"})),
            ("erin", "person", json!({"role": "manager", "team": "core"})),
            ("frank", "person", json!({"role": null})),
        ];
        for (key, doc_type, data) in fixtures {
            let mut doc = store.create(Some(key), doc_type, bag(data));
            store.persist(&mut doc).unwrap();
        }

        let managers = store
            .search("person", &[AttributeFilter::eq("role", "manager")])
            .unwrap();
        assert_eq!(keys(&managers), vec!["alice", "erin"]);

        let core_managers = store
            .search(
                "person",
                &[
                    AttributeFilter::eq("role", "manager"),
                    AttributeFilter::eq("team", "core"),
                ],
            )
            .unwrap();
        assert_eq!(keys(&core_managers), vec!["erin"]);

        let people = store.search("person", &[]).unwrap();
        assert_eq!(people.len(), 5);

        assert!(store.search("robot", &[]).unwrap().is_empty());
    });
}

#[test]
fn test_search_compares_textual_form() {
    for_each_backend(|store| {
        let mut doc = store.create(
            Some("n"),
            "metric",
            bag(json!({"count": 42, "enabled": true, "label": "42"})),
        );
        store.persist(&mut doc).unwrap();

        for (name, value) in [("count", "42"), ("enabled", "true"), ("label", "42")] {
            let found = store
                .search("metric", &[AttributeFilter::eq(name, value)])
                .unwrap();
            assert_eq!(keys(&found), vec!["n"], "filter {}={}", name, value);
        }

        assert!(store
            .search("metric", &[AttributeFilter::eq("count", "4")])
            .unwrap()
            .is_empty());
    });
}

#[test]
fn test_search_reflects_persisted_updates_only() {
    for_each_backend(|store| {
        let mut doc = store.create(Some("alice"), "person", bag(json!({"role": "engineer"})));
        store.persist(&mut doc).unwrap();

        store.update(&mut doc, [("role", "manager")]).unwrap();
        let filter = [AttributeFilter::eq("role", "manager")];
        assert!(store.search("person", &filter).unwrap().is_empty());

        store.persist(&mut doc).unwrap();
        assert_eq!(keys(&store.search("person", &filter).unwrap()), vec!["alice"]);
    });
}
