//! Error taxonomy and error-policy behavior across the stack.

use crate::common::{json_prefs, plain_prefs, Profile};
use prefstore::{DecodeError, Error, QueryExt};

#[tokio::test]
async fn empty_keys_fail_synchronously() {
    let prefs = plain_prefs();
    assert!(matches!(
        prefs.put("", 1i32).await.unwrap_err(),
        Error::InvalidArgument(_)
    ));
    assert!(matches!(
        prefs.get::<i32>("").await.unwrap_err(),
        Error::InvalidArgument(_)
    ));
    assert!(matches!(
        prefs.remove("").await.unwrap_err(),
        Error::InvalidArgument(_)
    ));
    assert!(prefs.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_serializer_is_a_fail_fast_configuration_error() {
    let prefs = plain_prefs();

    let err = prefs
        .put_object("p", &Profile::named("A", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingSerializer));

    let err = prefs.get_object::<Profile>("p").await.unwrap_err();
    assert!(matches!(err, Error::MissingSerializer));

    // Query construction fails before any execution or I/O.
    assert!(matches!(
        prefs.query_objects::<Profile>().unwrap_err(),
        Error::MissingSerializer
    ));
}

#[tokio::test]
async fn type_mismatch_is_a_decode_error() {
    let prefs = plain_prefs();
    prefs.put("age", 25i32).await.unwrap();

    let err = prefs.get::<String>("age").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Decode(DecodeError::TypeMismatch { .. })
    ));
}

#[tokio::test]
async fn bulk_queries_swallow_by_default_and_escalate_on_request() {
    let prefs = json_prefs();
    for (key, age) in [("p_1", 10), ("p_2", 20), ("p_3", 30), ("p_4", 40), ("p_5", 50)] {
        prefs
            .put_object(key, &Profile::named(key, age))
            .await
            .unwrap();
    }
    // Corrupt one entry behind the serializer's back.
    prefs.put("p_3", "{not json".to_string()).await.unwrap();

    let query = prefs.query_objects::<Profile>().unwrap().starts_with("p_");

    // Default: five keys, one malformed, four results.
    assert_eq!(query.execute().await.unwrap().len(), 4);

    // Strict: the first resolution failure aborts with the cause.
    let err = query.clone().fail_on_error().execute().await.unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Malformed { .. })));
}

#[tokio::test]
async fn direct_object_reads_never_swallow() {
    let prefs = json_prefs();
    prefs.put("p", "{not json".to_string()).await.unwrap();

    let err = prefs.get_object::<Profile>("p").await.unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Malformed { .. })));
}
