use paramsync_testing::assertions::{assert_env_entry, assert_no_key_with_prefix};
use paramsync_testing::{TestWorld, fixtures};

#[test]
fn test_remap_keys_in_env_writes_remapped_file() {
    let world = TestWorld::new().with_env_entries(&fixtures::sample_entries("PSYNC_DEV_key_"));

    let result = world
        .run(&[
            "remapKeysInEnv",
            "--outfile",
            "remapped.env",
            "--oldprefix",
            "PSYNC_DEV_",
            "--newprefix",
            "PSYNC_",
        ])
        .unwrap();

    assert!(result.success(), "stderr: {}", result.stderr());
    assert!(result.stdout().contains("Remapping keys in env"));
    assert!(result.stdout().contains("remapped.env"));

    let path = world.path("remapped.env");
    for entry in fixtures::sample_entries("PSYNC_key_") {
        assert_env_entry(&path, &entry.key, &entry.value).unwrap();
    }
    assert_no_key_with_prefix(&path, "PSYNC_DEV_").unwrap();

    let text = world.read_file("remapped.env").unwrap();
    assert!(text.contains("PSYNC_key_04='special$code'"));
    assert!(text.contains("PSYNC_key_05='\"quoted\"'"));
    assert!(text.contains("PSYNC_key_06='`code`!'"));
}

#[test]
fn test_remap_defaults_off_terminal() {
    let world = TestWorld::new()
        .with_env("DEV_PSYNC_DB_HOST", "localhost")
        .with_env("DEV_PSYNC_GREETING", "hello world");

    let result = world.run(&["remapKeysInEnv"]).unwrap();

    assert!(result.success(), "stderr: {}", result.stderr());
    let path = world.path(".env");
    assert_env_entry(&path, "PSYNC_DB_HOST", "localhost").unwrap();
    assert_env_entry(&path, "PSYNC_GREETING", "hello world").unwrap();
    assert!(
        world
            .read_file(".env")
            .unwrap()
            .contains("PSYNC_GREETING='hello world'")
    );
}

#[test]
fn test_remap_does_not_need_a_valid_config() {
    let world = TestWorld::new()
        .with_config("[store\n")
        .with_env("DEV_PSYNC_ONLY", "1");

    let result = world.run(&["remapKeysInEnv", "-o", "out.env"]).unwrap();

    assert!(result.success(), "stderr: {}", result.stderr());
    assert_env_entry(&world.path("out.env"), "PSYNC_ONLY", "1").unwrap();
}
