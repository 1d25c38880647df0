use assert_cmd::cargo::cargo_bin_cmd;
use paramsync_testing::TestWorld;
use predicates::prelude::*;

#[test]
fn test_missing_service_is_rejected_off_terminal() {
    let world = TestWorld::new();

    let result = world.run(&["saveParamsFile", "-e", "dev"]).unwrap();

    assert_eq!(result.code(), Some(1));
    assert!(result.stderr_matches(predicate::str::contains(
        "Error: Invalid input: --service is required"
    )));
    assert!(!world.path(".env").exists());
}

#[test]
fn test_blank_env_flag_is_rejected() {
    let world = TestWorld::new().with_file(".env", "A=1");

    let result = world
        .run(&["putToAWSFromFile", "-i", ".env", "-e", "", "-s", "api"])
        .unwrap();

    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("--env is required"));
}

#[test]
fn test_missing_parameter_name_is_rejected() {
    let world = TestWorld::new();

    let result = world
        .run(&["getParameter", "-e", "dev", "-s", "api"])
        .unwrap();

    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("--name is required"));
}

#[test]
fn test_invalid_config_reported_before_connecting() {
    let world = TestWorld::new().with_config("[store]\nwrite_concurrency = 0\n");

    let result = world.run(&["listEnvironments"]).unwrap();

    assert_eq!(result.code(), Some(1));
    assert!(result.stderr_matches(
        predicate::str::contains("Configuration error").and(predicate::str::contains(
            "write_concurrency"
        ))
    ));
}

#[test]
fn test_unknown_command_fails() {
    let mut cmd = cargo_bin_cmd!("paramsync");
    cmd.arg("loadParamsIntoEnv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
