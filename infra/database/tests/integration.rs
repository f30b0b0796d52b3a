use finman_database::*;
use finman_domain::config::DatabaseConfig;
use finman_domain::constants::{USERNAME_FIELD, USERS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Entry {
    username: String,
    amount: f64,
    note: String,
}

fn entry(username: &str, amount: f64) -> Entry {
    Entry { username: username.to_owned(), amount, note: format!("{username} spent {amount}") }
}

async fn memory_db(database: &str) -> Database {
    Database::builder().url("mem://").session("test_ns", database).init().await.expect("connect to mem://")
}

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = memory_db("health").await;

    db.health().await.expect("health check");
    assert_eq!(db.namespace(), "test_ns");
    assert_eq!(db.database(), "health");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));

    let err = Database::builder().url("mem://").init().await.unwrap_err();
    assert!(err.to_string().contains("Namespace is required"));
}

#[tokio::test]
async fn connect_from_config() {
    let db = Database::connect(&DatabaseConfig::default()).await.expect("connect from config");
    assert_eq!(db.database(), "financeManagerDB");
}

#[tokio::test]
async fn insert_then_find_by_field() {
    let db = memory_db("find").await;
    db.insert_one("Entries", &entry("alice", 12.5)).await.unwrap();
    db.insert_one("Entries", &entry("bob", 3.0)).await.unwrap();
    db.insert_one("Entries", &entry("alice", 7.25)).await.unwrap();

    let all: Vec<Entry> = db.find("Entries", &Filter::All).await.unwrap();
    assert_eq!(all.len(), 3);

    let mut alice: Vec<Entry> = db.find("Entries", &Filter::eq("Username", "alice")).await.unwrap();
    alice.sort_by(|a, b| a.amount.total_cmp(&b.amount));
    assert_eq!(alice, vec![entry("alice", 7.25), entry("alice", 12.5)]);
}

#[tokio::test]
async fn empty_collection_yields_empty_list() {
    let db = memory_db("empty").await;
    let found: Vec<Entry> = db.find("Nothing", &Filter::All).await.unwrap();
    assert!(found.is_empty());

    let one: Option<Entry> = db.find_one("Nothing", &Filter::eq("Username", "x")).await.unwrap();
    assert!(one.is_none());
}

#[tokio::test]
async fn find_one_returns_a_match() {
    let db = memory_db("find_one").await;
    db.insert_one("Entries", &entry("carol", 1.0)).await.unwrap();

    let found: Option<Entry> = db.find_one("Entries", &Filter::eq("Username", "carol")).await.unwrap();
    assert_eq!(found, Some(entry("carol", 1.0)));
}

#[tokio::test]
async fn delete_one_removes_a_single_document() {
    let db = memory_db("delete").await;
    db.insert_one("Entries", &entry("dave", 1.0)).await.unwrap();
    db.insert_one("Entries", &entry("dave", 2.0)).await.unwrap();

    let filter = Filter::eq("Username", "dave");
    assert_eq!(db.delete_one("Entries", &filter).await.unwrap(), 1);
    let left: Vec<Entry> = db.find("Entries", &filter).await.unwrap();
    assert_eq!(left.len(), 1);

    assert_eq!(db.delete_one("Entries", &Filter::eq("Username", "nobody")).await.unwrap(), 0);
}

#[tokio::test]
async fn usernames_are_unique_in_users() {
    let db = memory_db("unique").await;
    db.insert_one(USERS, &entry("erin", 0.0)).await.unwrap();

    let err = db.insert_one(USERS, &entry("erin", 1.0)).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict { .. }), "{err}");

    let users: Vec<Entry> = db.find(USERS, &Filter::eq(USERNAME_FIELD, "erin")).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_on_unique_index_conflict() {
    let db = memory_db("race").await;

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move { db.insert_one(USERS, &entry("frank", f64::from(i))).await })
        })
        .collect();

    let mut stored = 0;
    for writer in writers {
        match writer.await.expect("insert task") {
            Ok(()) => stored += 1,
            Err(err) => assert!(matches!(err, DatabaseError::Conflict { .. }), "{err}"),
        }
    }

    assert_eq!(stored, 1);
    let users: Vec<Entry> = db.find(USERS, &Filter::eq(USERNAME_FIELD, "frank")).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn invalid_filter_field_is_rejected_before_querying() {
    let db = memory_db("invalid").await;
    let err = db.find::<Entry>("Entries", &Filter::eq("Username = '' OR true", "")).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}
