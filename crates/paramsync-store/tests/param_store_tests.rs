use paramsync_store::*;
use paramsync_types::{EnvEntry, ParameterType};
use std::sync::Arc;

fn seeded_store(page_size: usize) -> Arc<InMemoryParameterStore> {
    let store = Arc::new(InMemoryParameterStore::with_page_size(page_size));
    for i in 1..=7 {
        store.insert(
            &format!("/torc/test/config-wrapper/param{:02}", i),
            &format!("value{:02}", i),
            ParameterType::Plain,
        );
    }
    store.insert(
        "/torc/test/config-wrapper/secretParam01",
        "secretValue01",
        ParameterType::Secret,
    );
    store.insert("/torc/dev/api/DB_HOST", "localhost", ParameterType::Plain);
    store.insert("/torc/dev/web/PORT", "8080", ParameterType::Plain);
    store
}

#[tokio::test]
async fn test_pagination_follows_every_token() {
    let store = seeded_store(3);
    let client = ParamStoreClient::new(store.clone());

    let params = client
        .get_parameters_by_service("test", "config-wrapper", true)
        .await
        .unwrap();

    // 8 items at 3 per page
    assert_eq!(store.list_requests(), 3);
    assert_eq!(
        store.list_tokens(),
        vec![None, Some("3".to_string()), Some("6".to_string())]
    );
    assert_eq!(params.len(), 8);
    assert_eq!(params["param01"].value, "value01");
    assert_eq!(params["param07"].value, "value07");
    assert_eq!(params["secretParam01"].value, "secretValue01");
    assert_eq!(params["secretParam01"].parameter_type, ParameterType::Secret);
    assert_eq!(
        params["param03"].full_name,
        "/torc/test/config-wrapper/param03"
    );
}

#[tokio::test]
async fn test_second_listing_served_from_cache() {
    let store = seeded_store(3);
    let client = ParamStoreClient::new(store.clone());

    let first = client
        .get_parameters_by_service("test", "config-wrapper", true)
        .await
        .unwrap();
    let requests_after_first = store.total_requests();

    let second = client
        .get_parameters_by_service("test", "config-wrapper", true)
        .await
        .unwrap();

    assert_eq!(store.total_requests(), requests_after_first);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_is_exact_path_and_decrypt_mode() {
    let store = seeded_store(10);
    let client = ParamStoreClient::new(store.clone());

    client.get_parameters_by_service("dev", "api", true).await.unwrap();
    client.get_parameters_by_service("dev", "web", true).await.unwrap();
    let raw = client
        .get_parameters_by_service("test", "config-wrapper", false)
        .await
        .unwrap();
    assert_eq!(store.list_requests(), 3);
    assert_eq!(raw["secretParam01"].value, memory::ENCRYPTED_PLACEHOLDER);

    let decrypted = client
        .get_parameters_by_service("test", "config-wrapper", true)
        .await
        .unwrap();
    assert_eq!(store.list_requests(), 4);
    assert_eq!(decrypted["secretParam01"].value, "secretValue01");
}

#[tokio::test]
async fn test_failed_page_does_not_populate_cache() {
    let store = seeded_store(3);
    store.fail_listing_after(2);
    let client = ParamStoreClient::new(store.clone());

    let err = client
        .get_parameters_by_service("test", "config-wrapper", true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert!(client.cache(true).is_empty());
}

#[tokio::test]
async fn test_cleared_cache_refetches() {
    let store = seeded_store(10);
    let client = ParamStoreClient::new(store.clone());

    client.get_parameters_by_service("dev", "api", true).await.unwrap();
    client.clear_cache();
    client.get_parameters_by_service("dev", "api", true).await.unwrap();

    assert_eq!(store.list_requests(), 2);
}

#[tokio::test]
async fn test_get_parameter_errors() {
    let store = seeded_store(10);
    store.deny("/torc/prod");
    let client = ParamStoreClient::new(store.clone());

    let param = client
        .get_parameter("dev", "api", "DB_HOST", false)
        .await
        .unwrap();
    assert_eq!(param.name, "DB_HOST");
    assert_eq!(param.value, "localhost");

    let missing = client
        .get_parameter("dev", "api", "NOPE", false)
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    let denied = client
        .get_parameter("prod", "api", "DB_HOST", false)
        .await
        .unwrap_err();
    assert_eq!(denied.kind(), ErrorKind::Unauthorized);

    let invalid = client.get_parameter("dev", "", "DB_HOST", false).await.unwrap_err();
    assert_eq!(invalid.kind(), ErrorKind::ValidationError);
    assert_eq!(store.get_requests(), 3);
}

#[tokio::test]
async fn test_set_parameter_respects_overwrite_and_encryption() {
    let store = seeded_store(10);
    let client = ParamStoreClient::new(store.clone());
    let entry = EnvEntry::new("DB_HOST", "db.internal");

    let err = client
        .set_parameter(&entry, "dev", "api", false, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(store.stored("/torc/dev/api/DB_HOST").unwrap().value, "localhost");

    let updated = client
        .set_parameter(&entry, "dev", "api", true, true)
        .await
        .unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.parameter_type, ParameterType::Secret);

    let stored = store.stored("/torc/dev/api/DB_HOST").unwrap();
    assert_eq!(stored.value, "db.internal");
    assert_eq!(stored.parameter_type, ParameterType::Secret);
}

#[tokio::test]
async fn test_batch_writes_isolate_failures() {
    let store = seeded_store(10);
    let client = ParamStoreClient::new(store.clone()).with_write_concurrency(2);

    let writes = vec![
        ParameterWrite::new(EnvEntry::new("NEW_ONE", "1"), false, false),
        ParameterWrite::new(EnvEntry::new("DB_HOST", "clash"), false, false),
        ParameterWrite::new(EnvEntry::new("NEW_SECRET", "s"), true, false),
        ParameterWrite::new(EnvEntry::new("PORT", "9000"), false, true),
    ];

    let outcomes = client.set_parameters_by_service(&writes, "dev", "api").await;

    let keys: Vec<&str> = outcomes.iter().map(|o| o.key.as_str()).collect();
    assert_eq!(keys, vec!["NEW_ONE", "DB_HOST", "NEW_SECRET", "PORT"]);
    assert!(outcomes[0].is_ok());
    assert_eq!(
        outcomes[1].result.as_ref().unwrap_err().kind(),
        ErrorKind::AlreadyExists
    );
    assert!(outcomes[2].is_ok());
    assert!(outcomes[3].is_ok());
    assert_eq!(store.put_requests(), 4);
    assert_eq!(
        store.stored("/torc/dev/api/NEW_SECRET").unwrap().parameter_type,
        ParameterType::Secret
    );
}

#[tokio::test]
async fn test_hierarchy_listings() {
    let store = seeded_store(4);
    let client = ParamStoreClient::new(store.clone());

    let environments = client.list_environments().await.unwrap();
    assert_eq!(environments["test"], 8);
    assert_eq!(environments["dev"], 2);

    let services = client.list_services("dev").await.unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services["api"], 1);
    assert_eq!(services["web"], 1);

    let tree = client.list_all_parameters(true).await.unwrap();
    assert_eq!(tree["test"]["config-wrapper"].len(), 8);
    assert!(tree["test"]["config-wrapper"].contains_key("secretParam01"));
    assert_eq!(tree["dev"]["web"]["PORT"].value, "8080");
}

#[tokio::test]
async fn test_custom_root() {
    let store = Arc::new(InMemoryParameterStore::new());
    store.insert("/org/config/dev/api/KEY", "v", ParameterType::Plain);
    store.insert("/elsewhere/dev/api/KEY", "x", ParameterType::Plain);
    let client = ParamStoreClient::new(store.clone())
        .with_paths(paramsync_core::PathBuilder::new("/org/config"));

    let tree = client.list_all_parameters(false).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree["dev"]["api"]["KEY"].value, "v");
}

#[tokio::test]
async fn test_counts_skip_parameters_stored_at_a_service_path() {
    let store = seeded_store(4);
    store.insert("/torc/dev/api", "orphan", ParameterType::Plain);
    let client = ParamStoreClient::new(store.clone());

    let environments = client.list_environments().await.unwrap();
    let services = client.list_services("dev").await.unwrap();
    let tree = client.list_all_parameters(false).await.unwrap();

    assert_eq!(environments["dev"], 2);
    assert_eq!(services["api"], 1);
    let listed: usize = tree["dev"].values().map(|params| params.len()).sum();
    assert_eq!(listed, environments["dev"]);
}

#[tokio::test]
async fn test_environment_and_service_must_be_single_segments() {
    let store = seeded_store(3);
    let client = ParamStoreClient::new(store.clone());

    let err = client
        .get_parameters_by_service("dev", "api/v2", true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let err = client
        .set_parameter(&EnvEntry::new("KEY", "value"), "dev", "api/v2", false, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let err = client.list_services("dev/api").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    assert_eq!(store.total_requests(), 0);
    assert!(store.stored("/torc/dev/api/v2/KEY").is_none());
}
