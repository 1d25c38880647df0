use paramsync_core::*;
use paramsync_types::EnvEntry;
use tempfile::TempDir;

fn sample_entries() -> Vec<EnvEntry> {
    vec![
        EnvEntry::new("key01", "value01"),
        EnvEntry::new("key02", "value02"),
        EnvEntry::new("key03", "value03"),
        EnvEntry::new("key04", "special$code"),
        EnvEntry::new("key05", "\"quoted\""),
        EnvEntry::new("key06", "`code`!"),
    ]
}

#[test]
fn test_round_trip_preserves_special_values() {
    let entries = sample_entries();
    let decoded = decode(&encode(&entries));
    assert_eq!(decoded, entries);
}

#[test]
fn test_round_trip_with_embedded_single_quote() {
    let entries = vec![EnvEntry::new("GREETING", "it's a \"test\"")];
    assert_eq!(decode(&encode(&entries)), entries);
}

#[test]
fn test_rendered_file_layout() {
    insta::assert_snapshot!(encode(&sample_entries()), @r#"
    key01=value01
    key02=value02
    key03=value03
    key04='special$code'
    key05='"quoted"'
    key06='`code`!'
    "#);
}

#[test]
fn test_write_then_read_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".env");
    let entries = vec![EnvEntry::new("A", "plain"), EnvEntry::new("B", "has space")];

    let rendered = write_env_file(&path, &entries).unwrap();
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(rendered, on_disk);
    assert_eq!(on_disk.lines().nth(1), Some("B='has space'"));

    let read_back = read_env_file(&path).unwrap();
    assert_eq!(read_back, entries);
}

#[test]
fn test_write_creates_missing_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("deploy/dev/api.env");

    write_env_file(&path, &[EnvEntry::new("PORT", "8080")]).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "PORT=8080");
}

#[test]
fn test_read_missing_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.env");

    let err = read_env_file(&path).unwrap_err();
    assert!(err.to_string().contains("missing.env"));
}

#[test]
fn test_remap_prefix_preserves_order_and_values() {
    let expected = vec![
        EnvEntry::new("new_key_01", "value01"),
        EnvEntry::new("new_key_02", "value02"),
        EnvEntry::new("new_key_03", "value03"),
        EnvEntry::new("new_key_04", "special$code"),
        EnvEntry::new("new_key_05", "\"quoted\""),
        EnvEntry::new("new_key_06", "`code`!"),
    ];
    assert_eq!(remap_prefix(&sample_entries(), "key", "new_key_"), expected);

    let mixed = vec![
        EnvEntry::new("OTHER", "x"),
        EnvEntry::new("key07", "y"),
        EnvEntry::new("ALSO_OTHER", "z"),
    ];
    let remapped = remap_prefix(&mixed, "key", "K");
    assert_eq!(remapped[0], mixed[0]);
    assert_eq!(remapped[1], EnvEntry::new("K07", "y"));
    assert_eq!(remapped[2], mixed[2]);
}

#[test]
fn test_build_path_is_deterministic() {
    let builder = PathBuilder::default();
    for (env, service) in [("dev", "api"), ("prod", "billing"), ("test", "config-wrapper")] {
        let first = builder.build_path(env, service, None);
        let second = builder.build_path(env, service, None);
        assert_eq!(first, second);

        let segments: Vec<&str> = first.split('/').collect();
        assert_eq!(segments[builder.environment_index()], env);
        assert_eq!(segments[builder.service_index()], service);

        let parsed = builder.parse(&first).unwrap();
        assert_eq!(parsed.environment, env);
        assert_eq!(parsed.service, service);
        assert_eq!(parsed.name, None);
    }
}
