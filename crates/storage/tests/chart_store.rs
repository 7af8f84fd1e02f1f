#![forbid(unsafe_code)]

use om_core::{ChartEdge, ChartNode, NodeData, Position};
use om_storage::{ChartStore, StoreError};
use rusqlite::OptionalExtension;
use std::path::Path;

fn temp_dir(name: &str) -> std::path::PathBuf {
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = std::env::temp_dir().join(format!(
        "om_storage_{}_{}_{}",
        name,
        std::process::id(),
        nonce
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn person(id: &str, name: &str) -> ChartNode {
    ChartNode {
        id: id.to_string(),
        position: Position { x: 10.0, y: 20.0 },
        data: NodeData::new(name, "Title", "Dept"),
    }
}

fn edge(id: &str, source: &str, target: &str) -> ChartEdge {
    ChartEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
    }
}

fn seed_blob(dir: &Path, blob: &str) {
    let conn = rusqlite::Connection::open(dir.join("orgmap.db")).expect("open db for seeding");
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL);",
    )
    .expect("create kv table");
    conn.execute(
        "INSERT OR REPLACE INTO kv(key, value) VALUES ('org-charts', ?1)",
        rusqlite::params![blob],
    )
    .expect("seed charts blob");
}

fn stored_blob(dir: &Path) -> Option<String> {
    let conn = rusqlite::Connection::open(dir.join("orgmap.db")).expect("open db for reading");
    conn.query_row("SELECT value FROM kv WHERE key = 'org-charts'", [], |row| {
        row.get(0)
    })
    .optional()
    .expect("read charts blob")
}

#[test]
fn save_then_load_round_trips() {
    let dir = temp_dir("round_trip");
    let mut store = ChartStore::open(&dir).expect("open store");
    assert!(store.charts().is_empty());
    assert!(!store.exists("Q4"));

    let nodes = vec![person("1", "Morgan Reed"), person("2", "Riley Chen")];
    let edges = vec![edge("e1-2", "1", "2")];
    store
        .save("Q4", nodes.clone(), edges.clone())
        .expect("save chart");

    assert!(store.exists("Q4"));
    let snapshot = store.load("Q4").expect("chart is loadable");
    assert_eq!(snapshot.nodes, nodes);
    assert_eq!(snapshot.edges, edges);
    assert!(snapshot.created_at_ms > 0);
    assert_eq!(snapshot.created_at_ms, snapshot.updated_at_ms);

    let created = snapshot.created_at_ms;
    store
        .save("Q4", vec![person("1", "Morgan Reed")], Vec::new())
        .expect("overwrite chart");
    let snapshot = store.load("Q4").expect("still loadable");
    assert_eq!(snapshot.created_at_ms, created);
    assert!(snapshot.updated_at_ms >= created);
    assert_eq!(snapshot.nodes.len(), 1);
    assert_eq!(store.charts().len(), 1);
}

#[test]
fn listing_keeps_insertion_order() {
    let dir = temp_dir("insertion_order");
    let mut store = ChartStore::open(&dir).expect("open store");
    store.save("Charlie", Vec::new(), Vec::new()).expect("save");
    store.save("Alpha", Vec::new(), Vec::new()).expect("save");
    store.save("Bravo", Vec::new(), Vec::new()).expect("save");

    let names: Vec<&str> = store.charts().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Charlie", "Alpha", "Bravo"]);
}

#[test]
fn overwrite_keeps_created_at_and_listing_slot() {
    let dir = temp_dir("overwrite_slot");
    seed_blob(
        &dir,
        r#"[
            {"name":"Quarterly","nodes":[{"id":"1","position":{"x":0.0,"y":0.0},"data":{"name":"Old Occupant","title":"Old","department":"Old"}}],"edges":[],"createdAt":1111,"updatedAt":1111},
            {"name":"Offsite","nodes":[],"edges":[],"createdAt":2222,"updatedAt":2222}
        ]"#,
    );

    let mut store = ChartStore::open(&dir).expect("open seeded store");
    assert_eq!(store.charts().len(), 2);

    store
        .save("Quarterly", vec![person("1", "New Occupant")], Vec::new())
        .expect("overwrite seeded chart");

    let names: Vec<&str> = store.charts().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Quarterly", "Offsite"], "slot must not move");

    let quarterly = store.load("Quarterly").expect("present");
    assert_eq!(quarterly.created_at_ms, 1111, "createdAt survives overwrite");
    assert!(quarterly.updated_at_ms > 1111);
    assert_eq!(quarterly.nodes[0].data.name, "New Occupant");

    let offsite = store.load("Offsite").expect("present");
    assert_eq!(offsite.created_at_ms, 2222);
    assert_eq!(offsite.updated_at_ms, 2222, "other charts untouched");
}

#[test]
fn save_rejects_blank_names() {
    let dir = temp_dir("blank_names");
    let mut store = ChartStore::open(&dir).expect("open store");

    for name in ["", "   ", "\t"] {
        let err = store
            .save(name, vec![person("1", "Morgan Reed")], Vec::new())
            .expect_err("blank name must be rejected");
        assert!(matches!(err, StoreError::InvalidInput(_)), "got: {err}");
    }
    assert!(store.charts().is_empty());
    assert_eq!(stored_blob(&dir), None, "nothing may be persisted");
}

#[test]
fn names_match_exactly() {
    let dir = temp_dir("exact_names");
    let mut store = ChartStore::open(&dir).expect("open store");
    store.save("Q4", Vec::new(), Vec::new()).expect("save");

    assert!(!store.exists("q4"));
    assert!(!store.exists(" Q4"));
    assert!(!store.exists("Q4 "));
    assert!(store.load("q4").is_none());

    store.save(" Q4 ", Vec::new(), Vec::new()).expect("padded name is distinct");
    assert_eq!(store.charts().len(), 2);
}

#[test]
fn delete_removes_the_chart() {
    let dir = temp_dir("delete");
    let mut store = ChartStore::open(&dir).expect("open store");
    store.save("Q4", vec![person("1", "Morgan Reed")], Vec::new()).expect("save");

    assert!(store.delete("Q4").expect("delete"));
    assert!(!store.exists("Q4"));
    assert!(store.charts().is_empty());
    assert!(!store.delete("Q4").expect("second delete is a no-op"));
}

#[test]
fn deleting_an_absent_name_is_a_quiet_noop() {
    let dir = temp_dir("delete_absent");
    let mut store = ChartStore::open(&dir).expect("open store");
    store.save("Keep", Vec::new(), Vec::new()).expect("save");
    let before = stored_blob(&dir).expect("saved blob present");

    assert!(!store.delete("Missing").expect("absent delete"));
    assert_eq!(store.charts().len(), 1);
    assert_eq!(stored_blob(&dir).expect("still present"), before, "no rewrite");
}

#[test]
fn collection_survives_reopen() {
    let dir = temp_dir("reopen");
    {
        let mut store = ChartStore::open(&dir).expect("open store");
        store
            .save("Persistent", vec![person("1", "Dana Flores")], vec![edge("e1-1", "1", "1")])
            .expect("save");
    }

    let store = ChartStore::open(&dir).expect("reopen store");
    let snapshot = store.load("Persistent").expect("chart survives reopen");
    assert_eq!(snapshot.nodes[0].data.name, "Dana Flores");
    assert_eq!(snapshot.edges.len(), 1);
}

#[test]
fn hydrates_payloads_written_by_other_frontends() {
    let dir = temp_dir("hydrate_camel");
    seed_blob(
        &dir,
        r#"[{
            "name": "Seeded",
            "nodes": [{
                "id": "1",
                "type": "orgNode",
                "position": {"x": 250, "y": 5},
                "data": {"name": "Morgan Reed", "title": "CEO", "department": "Executive", "avatar": "m.png"}
            }],
            "edges": [{"id": "e1-1", "source": "1", "target": "1", "animated": true}],
            "createdAt": 1700000000000,
            "updatedAt": 1700000001000
        }]"#,
    );

    let store = ChartStore::open(&dir).expect("open seeded store");
    let snapshot = store.load("Seeded").expect("seeded chart hydrates");
    assert_eq!(snapshot.nodes[0].position, Position { x: 250.0, y: 5.0 });
    assert_eq!(snapshot.nodes[0].data.department, "Executive");
    assert_eq!(snapshot.edges[0].id, "e1-1");
    assert_eq!(snapshot.created_at_ms, 1_700_000_000_000);
}

#[test]
fn malformed_blob_degrades_to_empty_without_a_rewrite() {
    let dir = temp_dir("malformed_blob");
    seed_blob(&dir, "definitely not json{");

    let mut store = ChartStore::open(&dir).expect("open survives bad blob");
    assert!(store.charts().is_empty());
    assert_eq!(
        stored_blob(&dir).expect("blob still present"),
        "definitely not json{",
        "bad bytes are kept until the next save"
    );

    store.save("Fresh", Vec::new(), Vec::new()).expect("save after degrade");
    let blob = stored_blob(&dir).expect("blob rewritten");
    assert!(blob.starts_with('['), "got: {blob}");
    assert!(blob.contains("\"Fresh\""));
}

#[test]
fn a_blob_with_a_broken_record_degrades_as_a_whole() {
    let dir = temp_dir("broken_record");
    // second record is missing `position`, which is required
    seed_blob(
        &dir,
        r#"[
            {"name":"Fine","nodes":[],"edges":[],"createdAt":1,"updatedAt":1},
            {"name":"Broken","nodes":[{"id":"1","data":{"name":"X","title":"Y","department":"Z"}}],"edges":[],"createdAt":2,"updatedAt":2}
        ]"#,
    );

    let store = ChartStore::open(&dir).expect("open survives broken record");
    assert!(store.charts().is_empty(), "decode is all-or-nothing");
}

#[test]
fn seeded_duplicate_names_load_first_and_delete_all() {
    let dir = temp_dir("duplicate_names");
    seed_blob(
        &dir,
        r#"[
            {"name":"Twin","nodes":[{"id":"1","position":{"x":0,"y":0},"data":{"name":"First Twin","title":"T","department":"D"}}],"edges":[],"createdAt":1,"updatedAt":1},
            {"name":"Twin","nodes":[{"id":"1","position":{"x":0,"y":0},"data":{"name":"Second Twin","title":"T","department":"D"}}],"edges":[],"createdAt":2,"updatedAt":2}
        ]"#,
    );

    let mut store = ChartStore::open(&dir).expect("open seeded store");
    assert_eq!(store.charts().len(), 2);
    assert!(store.exists("Twin"));
    let loaded = store.load("Twin").expect("present");
    assert_eq!(loaded.nodes[0].data.name, "First Twin", "first match wins");

    assert!(store.delete("Twin").expect("delete"));
    assert!(store.charts().is_empty(), "delete removes every duplicate");
}
