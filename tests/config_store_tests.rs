//! ConfigStore load/save integration tests
//!
//! Run with: cargo test --test config_store_tests

use inistore::config::{self, Records};
use inistore::{ConfigStore, Error, FieldValue, RecordInstance, RecordType};
use std::fs;
use tempfile::TempDir;

fn app() -> RecordType {
    RecordType::new("App").string("name", "")
}

fn server() -> RecordType {
    RecordType::new("Server")
        .string("host", "0.0.0.0")
        .int("port", 3456)
        .float("timeout", 2.5)
        .boolean("tls", false)
}

fn employee() -> RecordType {
    RecordType::new("Employee")
        .string("name", "")
        .int("age", 0)
        .string("position", "")
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_all_field_kinds() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.ini");

    let mut store = ConfigStore::new(&path, [server(), employee()]);
    store.load().unwrap();

    {
        let server = store.get_mut("Server").unwrap();
        server.set("host", "example.com").unwrap();
        server.set("port", 8443).unwrap();
        server.set("timeout", 0.125).unwrap();
        server.set("tls", true).unwrap();
    }
    store.get_mut("Employee").unwrap().set("age", -3).unwrap();
    store.save().unwrap();

    let reloaded = ConfigStore::open(&path, [server(), employee()]).unwrap();
    assert_eq!(reloaded.get("Server").unwrap(), store.get("Server").unwrap());
    assert_eq!(reloaded.get("Employee").unwrap(), store.get("Employee").unwrap());

    let server = reloaded.get("Server").unwrap();
    assert_eq!(server.get_str("host").unwrap(), "example.com");
    assert_eq!(server.get_int("port").unwrap(), 8443);
    assert_eq!(server.get_float("timeout").unwrap(), 0.125);
    assert!(server.get_bool("tls").unwrap());
}

#[test]
fn test_save_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.ini");

    let store = ConfigStore::open(&path, [server(), app()]).unwrap();
    store.save().unwrap();
    let first = fs::read(&path).unwrap();
    store.save().unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);

    // Loading and saving again also leaves the bytes alone
    ConfigStore::open(&path, [server(), app()]).unwrap().save().unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_example_scenario() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.ini");

    let records = config::load(&path, &[app()]).unwrap();
    assert_eq!(records["App"].get("name").unwrap(), &FieldValue::Str(String::new()));

    config::save(&path, &[app()], &records).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[App]\nname = \n\n");

    let again = config::load(&path, &[app()]).unwrap();
    assert_eq!(again, records);
}

// ============================================================================
// Default fallback
// ============================================================================

#[test]
fn test_nonexistent_file_loads_defaults() {
    let tmp = TempDir::new().unwrap();
    let store = ConfigStore::open(tmp.path().join("missing.ini"), [server(), app()]).unwrap();

    assert_eq!(store.get("Server").unwrap(), &RecordInstance::defaults(&server()));
    assert_eq!(store.get("App").unwrap(), &RecordInstance::defaults(&app()));
    assert!(!tmp.path().join("missing.ini").exists());
}

#[test]
fn test_unreadable_path_loads_defaults() {
    // A directory cannot be read as a file
    let tmp = TempDir::new().unwrap();
    let store = ConfigStore::open(tmp.path(), [app()]).unwrap();
    assert_eq!(store.get("App").unwrap().get_str("name").unwrap(), "");
}

#[test]
fn test_malformed_file_loads_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.ini");
    fs::write(&path, "[Server]\nport = 1\n[Server]\nport = 2\n").unwrap();

    let store = ConfigStore::open(&path, [server()]).unwrap();
    assert_eq!(store.get("Server").unwrap().get_int("port").unwrap(), 3456);
}

#[test]
fn test_missing_section_defaults_only_that_type() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("partial.ini");
    fs::write(&path, "[Employee]\nname = Ada\nage = 36\nposition = engineer\n").unwrap();

    let store = ConfigStore::open(&path, [server(), employee()]).unwrap();
    assert_eq!(store.get("Server").unwrap(), &RecordInstance::defaults(&server()));

    let employee = store.get("Employee").unwrap();
    assert_eq!(employee.get_str("name").unwrap(), "Ada");
    assert_eq!(employee.get_int("age").unwrap(), 36);
    assert_eq!(employee.get_str("position").unwrap(), "engineer");
}

#[test]
fn test_partial_section_keeps_declared_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("partial.ini");
    fs::write(&path, "[Server]\nPORT = 9000\n").unwrap();

    let store = ConfigStore::open(&path, [server()]).unwrap();
    let server = store.get("Server").unwrap();
    assert_eq!(server.get_int("port").unwrap(), 9000);
    assert_eq!(server.get_str("host").unwrap(), "0.0.0.0");
    assert_eq!(server.get_float("timeout").unwrap(), 2.5);
    assert!(!server.get_bool("tls").unwrap());
}

// ============================================================================
// Coercion
// ============================================================================

#[test]
fn test_boolean_coercion_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("flags.ini");
    let flags = RecordType::new("Flags")
        .boolean("a", false)
        .boolean("b", false)
        .boolean("c", false)
        .boolean("d", true)
        .boolean("e", true)
        .boolean("f", true)
        .boolean("g", true);
    fs::write(
        &path,
        "[Flags]\na = TRUE\nb = Yes\nc = 1\nd = false\ne = no\nf = 0\ng = enabled\n",
    )
    .unwrap();

    let store = ConfigStore::open(&path, [flags]).unwrap();
    let values: Vec<bool> = store
        .get("Flags")
        .unwrap()
        .values()
        .map(|(_, v)| v.as_bool().unwrap())
        .collect();
    assert_eq!(values, vec![true, true, true, false, false, false, false]);
}

#[test]
fn test_malformed_number_fails_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.ini");
    fs::write(&path, "[Server]\nport = eighty\n").unwrap();

    let err = config::load(&path, &[server()]).unwrap_err();
    match err {
        Error::TypeConversion {
            record,
            field,
            value,
            ..
        } => {
            assert_eq!(record, "Server");
            assert_eq!(field, "port");
            assert_eq!(value, "eighty");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_failed_load_keeps_previous_state() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.ini");
    fs::write(&path, "[Server]\nport = 1234\n").unwrap();

    let mut store = ConfigStore::open(&path, [server()]).unwrap();
    fs::write(&path, "[Server]\ntimeout = soon\n").unwrap();

    assert!(matches!(store.load(), Err(Error::TypeConversion { .. })));
    assert_eq!(store.get("Server").unwrap().get_int("port").unwrap(), 1234);
}

// ============================================================================
// Save semantics
// ============================================================================

#[test]
fn test_save_overwrites_and_drops_undeclared_keys() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.ini");
    fs::write(&path, "# comment\n[App]\nname = demo\nstale = yes\n").unwrap();

    ConfigStore::open(&path, [app()]).unwrap().save().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[App]\nname = demo\n\n");
}

#[test]
fn test_save_without_load_writes_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("fresh.ini");

    ConfigStore::new(&path, [app(), server()]).save().unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "[App]\nname = \n\n[Server]\nhost = 0.0.0.0\nport = 3456\ntimeout = 2.5\ntls = false\n\n"
    );
}

#[test]
fn test_save_missing_instance_in_mapping() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("map.ini");

    config::save(&path, &[server()], &Records::new()).unwrap();
    let records = config::load(&path, &[server()]).unwrap();
    assert_eq!(records["Server"], RecordInstance::defaults(&server()));
}

#[test]
fn test_multiline_string_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("motd.ini");
    let motd = RecordType::new("Motd").string("text", "");

    let mut store = ConfigStore::new(&path, [motd.clone()]);
    store.load().unwrap();
    store
        .get_mut("Motd")
        .unwrap()
        .set("text", "welcome\nback")
        .unwrap();
    store.save().unwrap();

    let reloaded = ConfigStore::open(&path, [motd]).unwrap();
    assert_eq!(reloaded.get("Motd").unwrap().get_str("text").unwrap(), "welcome\nback");
}

#[test]
fn test_awkward_strings_round_trip_without_touching_other_records() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notes.ini");
    let notes = RecordType::new("Notes").string("text", "");
    let texts = [
        "a\n\nb",
        "a\n#b",
        "a\n;b",
        "trailing newline\n",
        "  leading and trailing  ",
        "\"already quoted\"",
        "a\n[Server]\nport = 1",
    ];

    for text in texts {
        let mut store = ConfigStore::open(&path, [notes.clone(), server()]).unwrap();
        store.get_mut("Notes").unwrap().set("text", text).unwrap();
        store.get_mut("Server").unwrap().set("port", 9000).unwrap();
        store.save().unwrap();

        let reloaded = ConfigStore::open(&path, [notes.clone(), server()]).unwrap();
        assert_eq!(reloaded.get("Notes").unwrap().get_str("text").unwrap(), text);
        assert_eq!(reloaded.get("Server").unwrap().get_int("port").unwrap(), 9000);
        assert_eq!(reloaded.get("Server").unwrap().get_str("host").unwrap(), "0.0.0.0");
    }
}

#[test]
fn test_set_instance_from_other_schema_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("people.ini");
    let mut store = ConfigStore::open(&path, [employee()]).unwrap();

    let stale = RecordType::new("Employee").string("name", "").string("age", "old");
    let err = store.set(RecordInstance::defaults(&stale)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { ref field, .. } if field == "age"));

    store.save().unwrap();
    let reloaded = ConfigStore::open(&path, [employee()]).unwrap();
    assert_eq!(reloaded.get("Employee").unwrap().get_int("age").unwrap(), 0);
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn test_unregistered_name_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let store = ConfigStore::open(tmp.path().join("x.ini"), [app()]).unwrap();
    let err = store.get("Book").unwrap_err();
    assert!(matches!(err, Error::RecordNotFound(ref name) if name == "Book"));
    assert!(err.to_string().contains("Book"));
}

#[test]
fn test_instances_follow_registration_order() {
    let tmp = TempDir::new().unwrap();
    let store = ConfigStore::open(tmp.path().join("x.ini"), [server(), app(), employee()]).unwrap();
    let names: Vec<&str> = store.instances().map(|i| i.record()).collect();
    assert_eq!(names, vec!["Server", "App", "Employee"]);
}

#[test]
fn test_register_after_load_then_reload() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("late.ini");
    fs::write(&path, "[App]\nname = a\n\n[Employee]\nname = Grace\n").unwrap();

    let mut store = ConfigStore::open(&path, [app()]).unwrap();
    assert!(store.get("Employee").is_err());

    store.register(employee());
    store.load().unwrap();
    assert_eq!(store.get("Employee").unwrap().get_str("name").unwrap(), "Grace");
}
