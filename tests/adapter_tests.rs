mod common;

use bucket_console::listing::is_folder;
use bucket_console::providers::memory::StoreOperation;
use bucket_console::{AdapterError, Credentials, FileUpload, StoreError};
use common::*;

#[tokio::test]
async fn every_operation_requires_configuration() {
    let adapter = adapter(&remote());

    assert_eq!(adapter.test_connection().await, Err(AdapterError::NotConfigured));
    assert_eq!(adapter.list_objects().await, Err(AdapterError::NotConfigured));
    assert_eq!(adapter.get_bucket_info().await, Err(AdapterError::NotConfigured));
    assert_eq!(adapter.delete_object("a").await, Err(AdapterError::NotConfigured));
    assert_eq!(
        adapter.upload_file(FileUpload::empty(), "a").await,
        Err(AdapterError::NotConfigured)
    );
    assert_eq!(adapter.create_folder("a").await, Err(AdapterError::NotConfigured));
    assert_eq!(
        adapter.rename_object("a", "b").await,
        Err(AdapterError::NotConfigured)
    );
    assert_eq!(
        adapter.rename_object("a", "a").await,
        Err(AdapterError::NotConfigured)
    );
    assert_eq!(
        adapter.get_download_url("a").await,
        Err(AdapterError::NotConfigured)
    );
}

#[tokio::test]
async fn test_connection_lists_a_single_key() {
    let remote = remote();
    remote.insert(BUCKET, "a.txt", "a");
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    assert_eq!(adapter.test_connection().await, Ok(true));
    assert_eq!(remote.requests(), vec![StoreOperation::List]);
}

#[tokio::test]
async fn test_connection_propagates_remote_error_unchanged() {
    let remote = remote();
    let err = StoreError::service("InvalidBucketName", "The specified bucket is not valid.");
    remote.fail_next(StoreOperation::List, err.clone());
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    assert_eq!(adapter.test_connection().await, Err(AdapterError::Remote(err)));
}

#[tokio::test]
async fn configure_replaces_previous_configuration() {
    let remote = remote();
    remote.create_bucket("other");
    remote.insert("other", "only-in-other.txt", "x");
    let adapter = adapter(&remote);

    adapter.configure(credentials());
    assert!(adapter.list_objects().await.unwrap().is_empty());

    adapter.configure(Credentials::new(ACCESS_KEY, SECRET_KEY, "eu-west-1", "other"));
    let keys: Vec<_> = adapter
        .list_objects()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.key)
        .collect();
    assert_eq!(keys, vec!["only-in-other.txt"]);
    assert_eq!(adapter.credentials().unwrap().region, "eu-west-1");

    adapter.reset();
    assert!(!adapter.is_configured());
}

#[tokio::test]
async fn bucket_info_sums_sizes() {
    let remote = remote();
    remote.insert(BUCKET, "a", vec![1u8; 100]);
    remote.insert(BUCKET, "b", vec![1u8; 23]);
    remote.insert(BUCKET, "dir/", "");
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    let info = adapter.get_bucket_info().await.unwrap();

    assert_eq!(info.name, BUCKET);
    assert_eq!(info.region, REGION);
    assert_eq!(info.object_count, 3);
    assert_eq!(info.total_size, 123);
}

#[tokio::test]
async fn upload_is_last_write_wins() {
    let remote = remote();
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    adapter
        .upload_file(FileUpload::from_bytes("first", Some("text/plain")), "note.txt")
        .await
        .unwrap();
    adapter
        .upload_file(FileUpload::from_bytes("second!", None), "note.txt")
        .await
        .unwrap();

    let stored = remote.object(BUCKET, "note.txt").unwrap();
    assert_eq!(stored.data, "second!");
    assert_eq!(stored.content_type, None);
}

#[tokio::test]
async fn create_folder_does_not_double_the_slash() {
    let remote = remote();
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    adapter.create_folder("photos").await.unwrap();
    adapter.create_folder("docs/").await.unwrap();

    assert_eq!(remote.keys(BUCKET), vec!["docs/", "photos/"]);
    let objects = adapter.list_objects().await.unwrap();
    assert!(objects.iter().all(|o| o.size == 0 && is_folder(&o.key)));
}

#[tokio::test]
async fn rename_reports_delete_failure_after_copy() {
    let remote = remote();
    remote.insert(BUCKET, "a.txt", "a");
    remote.fail_next(
        StoreOperation::Delete,
        StoreError::service("AccessDenied", "Access Denied"),
    );
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    let result = adapter.rename_object("a.txt", "b.txt").await;

    assert!(matches!(result, Err(AdapterError::Remote(_))));
    assert_eq!(remote.keys(BUCKET), vec!["a.txt", "b.txt"]);
    assert_eq!(
        remote.requests(),
        vec![StoreOperation::Copy, StoreOperation::Delete]
    );
}

#[tokio::test]
async fn rename_onto_itself_is_a_noop() {
    let remote = remote();
    remote.insert(BUCKET, "a.txt", "a");
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    adapter.rename_object("a.txt", "a.txt").await.unwrap();

    assert_eq!(remote.keys(BUCKET), vec!["a.txt"]);
    assert!(remote.requests().is_empty());
}

#[tokio::test]
async fn missing_source_fails_copy_and_skips_delete() {
    let remote = remote();
    let adapter = adapter(&remote);
    adapter.configure(credentials());

    let err = adapter.rename_object("ghost.txt", "b.txt").await.unwrap_err();

    assert_eq!(err.to_string(), "NoSuchKey: The specified key does not exist.");
    assert_eq!(remote.request_count(StoreOperation::Delete), 0);
}

#[tokio::test]
async fn adapters_over_separate_stores_are_isolated() {
    let first = remote();
    let second = remote();
    first.insert(BUCKET, "mine.txt", "x");

    let a = adapter(&first);
    let b = adapter(&second);
    a.configure(credentials());
    b.configure(credentials());

    assert_eq!(a.list_objects().await.unwrap().len(), 1);
    assert!(b.list_objects().await.unwrap().is_empty());
}
