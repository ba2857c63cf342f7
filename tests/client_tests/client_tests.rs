//! Client Tests
//!
//! Drives the client against an in-process peer that answers frames from a
//! small in-memory document store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use docmux::mux::Multiplexer;
use docmux::protocol::{Command, Condition};
use docmux::{Client, DocmuxError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

type Store = HashMap<String, BTreeMap<String, Value>>;

fn ok(data: Option<Value>) -> String {
    match data {
        Some(data) => json!({"status": "success", "data": data}).to_string(),
        None => r#"{"status": "success"}"#.to_string(),
    }
}

fn err(message: &str) -> String {
    json!({"status": "error", "message": message}).to_string()
}

/// Execute one request line (`VERB args...`) against the store
fn execute(store: &mut Store, request: &str) -> String {
    let tokens: Vec<&str> = request.split(' ').collect();
    match tokens.as_slice() {
        ["EXISTS", name] => ok(Some(json!(store.contains_key(*name)))),
        ["CREATE", name] => {
            if store.contains_key(*name) {
                err("Collection already exists")
            } else {
                store.insert(name.to_string(), BTreeMap::new());
                ok(None)
            }
        }
        ["GET", doc, "FROM", coll] => match store.get(*coll) {
            None => err("Collection not found"),
            Some(c) => match c.get(*doc) {
                Some(v) => ok(Some(v.clone())),
                None => err("Document not found"),
            },
        },
        ["SET", doc, "FROM", coll, "TO", ..] => {
            let body = tokens[5..].join(" ");
            match (store.get_mut(*coll), serde_json::from_str::<Value>(&body)) {
                (None, _) => err("Collection not found"),
                (_, Err(_)) => err("Invalid JSON"),
                (Some(c), Ok(v)) => {
                    c.insert(doc.to_string(), v);
                    ok(None)
                }
            }
        }
        ["LIST", coll, rest @ ..] => match store.get(*coll) {
            None => err("Collection not found"),
            Some(c) => {
                let filter = match rest {
                    [] => None,
                    ["WHERE", key, "EQ", value] => Some((key.to_string(), value.to_string())),
                    _ => return err("Condition keywords are EQ, LT, or GT"),
                };
                let docs: BTreeMap<&String, &Value> = c
                    .iter()
                    .filter(|(_, v)| match &filter {
                        None => true,
                        Some((key, value)) => v.get(key).map(|f| match f {
                            Value::String(s) => s == value,
                            other => other.to_string() == *value,
                        }) == Some(true),
                    })
                    .collect();
                ok(Some(json!(docs)))
            }
        },
        ["DELETE", coll] => match store.remove(*coll) {
            Some(_) => ok(None),
            None => err("Collection not found"),
        },
        ["DELETE", doc, "FROM", coll] => match store.get_mut(*coll).and_then(|c| c.remove(*doc)) {
            Some(_) => ok(None),
            None => err("Document not found"),
        },
        _ => err("Unknown command"),
    }
}

/// Answer every frame from `frames` through `mux`, echoing the correlation id
fn spawn_peer(frames: Receiver<String>, mux: Arc<Multiplexer<Sender<String>>>) {
    thread::spawn(move || {
        let mut store = Store::new();
        for frame in frames.iter() {
            let mut parts = frame.splitn(3, ' ');
            let (Some("ID"), Some(id), Some(request)) = (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            let response = execute(&mut store, request);
            mux.on_frame_received(&format!("ID {} {}", id, response));
        }
    });
}

fn setup_client() -> Client<Sender<String>> {
    let (tx, rx) = channel::unbounded();
    let mux = Arc::new(Multiplexer::new(tx));
    spawn_peer(rx, Arc::clone(&mux));
    Client::with_multiplexer(mux, Some(Duration::from_secs(5)))
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    name: String,
    height: u32,
}

// =============================================================================
// Collection Tests
// =============================================================================

#[test]
fn test_create_and_exists() {
    let client = setup_client();

    assert!(!client.exists("users").unwrap());
    client.create("users").unwrap();
    assert!(client.exists("users").unwrap());
}

#[test]
fn test_create_twice_is_remote_error() {
    let client = setup_client();
    client.create("users").unwrap();

    let err = client.create("users").unwrap_err();
    assert_eq!(err.remote_message(), Some("Collection already exists"));
}

#[test]
fn test_delete_collection() {
    let client = setup_client();
    client.create("users").unwrap();

    client.delete_collection("users").unwrap();
    assert!(!client.exists("users").unwrap());
}

// =============================================================================
// Document Tests
// =============================================================================

#[test]
fn test_set_and_get() {
    let client = setup_client();
    client.create("users").unwrap();

    let user = User { name: "William Henderson".to_string(), height: 180 };
    client.set("users", "CoolTomato", &user).unwrap();

    assert_eq!(
        client.get("users", "CoolTomato").unwrap(),
        json!({"name": "William Henderson", "height": 180})
    );
    assert_eq!(client.get_as::<User>("users", "CoolTomato").unwrap(), user);
}

#[test]
fn test_get_missing_document() {
    let client = setup_client();
    client.create("users").unwrap();

    let err = client.get("users", "missing").unwrap_err();
    assert_eq!(err.remote_message(), Some("Document not found"));
}

#[test]
fn test_delete_document() {
    let client = setup_client();
    client.create("users").unwrap();
    client.set("users", "a", &json!({"n": 1})).unwrap();

    client.delete("users", "a").unwrap();
    assert!(client.get("users", "a").is_err());
}

#[test]
fn test_list_with_and_without_condition() {
    let client = setup_client();
    client.create("users").unwrap();
    client.set("users", "a", &json!({"team": "red"})).unwrap();
    client.set("users", "b", &json!({"team": "blue"})).unwrap();

    let all = client.list("users", None).unwrap();
    assert_eq!(all.as_object().unwrap().len(), 2);

    let red = client.list("users", Some(Condition::eq("team", "red"))).unwrap();
    assert_eq!(red, json!({"a": {"team": "red"}}));
}

#[test]
fn test_get_as_wrong_shape_is_serialization_error() {
    let client = setup_client();
    client.create("users").unwrap();
    client.set("users", "a", &json!([1, 2, 3])).unwrap();

    let err = client.get_as::<User>("users", "a").unwrap_err();
    assert!(matches!(err, DocmuxError::Serialization(_)));
}

// =============================================================================
// Concurrency and Timeout Tests
// =============================================================================

#[test]
fn test_many_threads_share_one_client() {
    let client = Arc::new(setup_client());
    client.create("users").unwrap();

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for i in 0..50 {
                    let doc = format!("u{}-{}", worker, i);
                    client.set("users", &doc, &json!({"i": i})).unwrap();
                    assert_eq!(client.get("users", &doc).unwrap(), json!({"i": i}));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(client.list("users", None).unwrap().as_object().unwrap().len(), 200);
    assert_eq!(client.multiplexer().pending_count(), 0);
}

#[test]
fn test_dispatch_then_wait_in_any_order() {
    let client = setup_client();
    client.create("users").unwrap();

    let first = client.dispatch(&Command::Exists { name: "users".to_string() });
    let second = client.dispatch(&Command::Exists { name: "posts".to_string() });

    assert_eq!(client.wait(second).unwrap(), json!(false));
    assert_eq!(client.wait(first).unwrap(), json!(true));
}

#[test]
fn test_timeout_cancels_request() {
    // Peer that never answers
    let (tx, _rx) = channel::unbounded::<String>();
    let mux = Arc::new(Multiplexer::new(tx));
    let client = Client::with_multiplexer(Arc::clone(&mux), Some(Duration::from_millis(30)));

    let err = client.get("users", "x").unwrap_err();

    assert!(matches!(err, DocmuxError::Timeout { waited_ms: 30, .. }));
    assert_eq!(mux.pending_count(), 0);
}

#[test]
fn test_exists_rejects_non_boolean_data() {
    let (tx, rx) = channel::unbounded::<String>();
    let mux = Arc::new(Multiplexer::new(tx));
    let client = Client::with_multiplexer(Arc::clone(&mux), Some(Duration::from_secs(5)));

    thread::spawn({
        let mux = Arc::clone(&mux);
        move || {
            for frame in rx.iter() {
                let id = frame.split(' ').nth(1).unwrap().to_string();
                mux.on_frame_received(&format!(r#"ID {} {{"status":"success","data":"yes"}}"#, id));
            }
        }
    });

    assert!(matches!(client.exists("users"), Err(DocmuxError::Protocol(_))));
}
