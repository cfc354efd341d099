use implementors_core::{
    load_shard_file, ImplementorDispatcher, ImplementorRegistry, ShardError,
};
use std::fs;

#[test]
fn loads_shard_files_in_any_order_into_one_registry() {
    let dir = tempfile::tempdir().expect("temp dir");
    let spin = dir.path().join("spin.json");
    let intrusive = dir.path().join("sos_intrusive.json");
    fs::write(
        &spin,
        r#"{"spin": ["impl<'a, T: ?Sized> Drop for <a href=\"spin/struct.MutexGuard.html\">MutexGuard</a>"]}"#,
    )
    .expect("write spin shard");
    fs::write(
        &intrusive,
        r#"{"sos_intrusive": ["impl<T, N> Drop for List<T, N>", "impl<T> Drop for Stack<T>"]}"#,
    )
    .expect("write intrusive shard");

    let mut dispatcher = ImplementorDispatcher::new();
    dispatcher.register(load_shard_file(&intrusive).expect("intrusive shard"));
    dispatcher
        .initialize(ImplementorRegistry::new(), None)
        .expect("init should succeed");
    dispatcher.register(load_shard_file(&spin).expect("spin shard"));

    let registry = dispatcher.sink().expect("sink should be ready");
    assert_eq!(registry.crate_names(), vec!["sos_intrusive", "spin"]);
    assert_eq!(registry.implementor_count(), 3);
    assert!(registry
        .get("spin")
        .map_or(false, |list| list[0].as_str().contains("MutexGuard")));
}

#[test]
fn missing_shard_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.json");

    let err = load_shard_file(&missing).expect_err("missing file must fail");
    assert!(matches!(err, ShardError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn malformed_shard_file_is_json_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"["spin"]"#).expect("write broken shard");

    let err = load_shard_file(&path).expect_err("array root must fail");
    assert!(matches!(err, ShardError::Json(_)));
}
