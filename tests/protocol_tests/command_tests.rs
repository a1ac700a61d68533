//! Command Tests
//!
//! Tests for argument parsing, arity checks and dispatch against the table.

use bytes::Bytes;
use kache::protocol::{Command, Reply};
use kache::store::Table;

fn args(tokens: &[&str]) -> Vec<Bytes> {
    tokens
        .iter()
        .map(|t| Bytes::copy_from_slice(t.as_bytes()))
        .collect()
}

fn run(table: &Table, tokens: &[&str]) -> Reply {
    Command::from_args(args(tokens)).execute(table)
}

fn bulk(s: &str) -> Reply {
    Reply::Bulk(Bytes::copy_from_slice(s.as_bytes()))
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_known_commands() {
    assert_eq!(
        Command::from_args(args(&["SET", "k", "v"])),
        Command::Set {
            key: Bytes::from_static(b"k"),
            value: Bytes::from_static(b"v"),
        }
    );
    assert_eq!(
        Command::from_args(args(&["GET", "k"])),
        Command::Get { key: Bytes::from_static(b"k") }
    );
    assert_eq!(
        Command::from_args(args(&["DEL", "a", "b"])),
        Command::Del { keys: args(&["a", "b"]) }
    );
    assert_eq!(
        Command::from_args(args(&["EXISTS", "k"])),
        Command::Exists { key: Bytes::from_static(b"k") }
    );
    assert_eq!(Command::from_args(args(&["PING"])), Command::Ping);
    assert_eq!(Command::from_args(args(&["COMMAND"])), Command::CommandInfo);
}

#[test]
fn test_verb_is_case_insensitive() {
    assert_eq!(Command::from_args(args(&["ping"])), Command::Ping);
    assert_eq!(
        Command::from_args(args(&["gEt", "k"])),
        Command::Get { key: Bytes::from_static(b"k") }
    );
}

#[test]
fn test_keys_keep_their_case() {
    assert_eq!(
        Command::from_args(args(&["get", "MixedKey"])),
        Command::Get { key: Bytes::from_static(b"MixedKey") }
    );
}

#[test]
fn test_delete_alias() {
    assert_eq!(
        Command::from_args(args(&["DELETE", "k"])),
        Command::Del { keys: args(&["k"]) }
    );
}

#[test]
fn test_wrong_arity_is_unknown() {
    for tokens in [
        &["SET", "k"][..],
        &["SET", "k", "v", "extra"][..],
        &["GET"][..],
        &["GET", "a", "b"][..],
        &["DEL"][..],
        &["EXISTS"][..],
        &["PING", "hello"][..],
        &["COMMAND", "DOCS"][..],
    ] {
        assert_eq!(
            Command::from_args(args(tokens)),
            Command::Unknown { name: tokens[0].to_string() },
            "tokens {:?}",
            tokens
        );
    }
}

#[test]
fn test_unknown_verb_keeps_original_spelling() {
    assert_eq!(
        Command::from_args(args(&["flushAll"])),
        Command::Unknown { name: "flushAll".to_string() }
    );
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_set_then_get() {
    let table = Table::new();

    assert_eq!(run(&table, &["SET", "foo", "bar"]), Reply::ok());
    assert_eq!(run(&table, &["GET", "foo"]), bulk("bar"));
    assert_eq!(run(&table, &["EXISTS", "foo"]), Reply::Integer(1));
}

#[test]
fn test_get_missing_is_null() {
    let table = Table::new();
    assert_eq!(run(&table, &["GET", "never-set"]), Reply::Null);
    assert_eq!(run(&table, &["EXISTS", "never-set"]), Reply::Integer(0));
}

#[test]
fn test_overwrite() {
    let table = Table::new();

    run(&table, &["SET", "k", "v1"]);
    run(&table, &["SET", "k", "v2"]);

    assert_eq!(run(&table, &["GET", "k"]), bulk("v2"));
}

#[test]
fn test_del_counts_only_present_keys() {
    let table = Table::new();
    run(&table, &["SET", "a", "1"]);
    run(&table, &["SET", "b", "2"]);

    assert_eq!(run(&table, &["DEL", "a", "missing", "b", "a"]), Reply::Integer(2));
    assert!(table.is_empty());
}

#[test]
fn test_del_absent_key_returns_zero() {
    let table = Table::new();
    run(&table, &["SET", "other", "x"]);

    assert_eq!(run(&table, &["DEL", "missing"]), Reply::Integer(0));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_repeated_del_returns_zero() {
    let table = Table::new();
    run(&table, &["SET", "foo", "bar"]);

    assert_eq!(run(&table, &["DEL", "foo"]), Reply::Integer(1));
    assert_eq!(run(&table, &["DEL", "foo"]), Reply::Integer(0));
    assert_eq!(run(&table, &["GET", "foo"]), Reply::Null);
    assert_eq!(run(&table, &["EXISTS", "foo"]), Reply::Integer(0));
}

#[test]
fn test_ping_and_command_stub() {
    let table = Table::new();
    assert_eq!(run(&table, &["PING"]), Reply::pong());
    assert_eq!(run(&table, &["COMMAND"]), Reply::ok());
}

#[test]
fn test_unknown_command_reply_names_verb() {
    let table = Table::new();
    assert_eq!(
        run(&table, &["FOO", "bar"]),
        Reply::Error("ERR unknown command 'FOO'".to_string())
    );
    assert_eq!(
        run(&table, &["set", "only-key"]),
        Reply::Error("ERR unknown command 'set'".to_string())
    );
    assert!(table.is_empty());
}

#[test]
fn test_empty_value_round_trips() {
    let table = Table::new();
    assert_eq!(run(&table, &["SET", "k", ""]), Reply::ok());
    assert_eq!(run(&table, &["GET", "k"]), Reply::Bulk(Bytes::new()));
}

#[test]
fn test_unknown_verb_with_line_breaks_stays_on_one_line() {
    let table = Table::new();
    match run(&table, &["X\r\n+OK"]) {
        Reply::Error(message) => {
            assert_eq!(message, "ERR unknown command 'X  +OK'");
        }
        other => panic!("Expected error reply, got {:?}", other),
    }
}

#[test]
fn test_binary_verb_reply_has_no_line_breaks() {
    let table = Table::new();
    let verb = Bytes::from_static(b"\x00\r\xff\n");
    match Command::from_args(vec![verb, Bytes::from_static(b"k")]).execute(&table) {
        Reply::Error(message) => {
            assert!(message.starts_with("ERR unknown command"), "{}", message);
            assert!(!message.contains('\r') && !message.contains('\n'), "{:?}", message);
        }
        other => panic!("Expected error reply, got {:?}", other),
    }
}
