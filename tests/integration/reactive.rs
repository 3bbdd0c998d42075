//! Watch/observe stream semantics.

use crate::common::{json_prefs, plain_prefs, Profile};
use futures::StreamExt;
use prefstore::QueryExt;

#[tokio::test]
async fn watch_sees_puts_and_removals() {
    let prefs = plain_prefs();
    prefs.put("n", 1i32).await.unwrap();

    let mut stream = prefs.watch::<i32>("n").unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), Some(1));

    prefs.put("n", 2i32).await.unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), Some(2));

    prefs.remove("n").await.unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn watch_object_decodes_each_emission() {
    let prefs = json_prefs();
    prefs
        .put_object("profile", &Profile::named("Alice", 30))
        .await
        .unwrap();

    let mut stream = prefs.watch_object::<Profile>("profile").unwrap();
    assert_eq!(
        stream.next().await.unwrap().unwrap().unwrap().name,
        "Alice"
    );

    prefs
        .put_object("profile", &Profile::named("Alyce", 31))
        .await
        .unwrap();
    assert_eq!(
        stream.next().await.unwrap().unwrap().unwrap().name,
        "Alyce"
    );
}

#[tokio::test]
async fn observed_query_reruns_over_current_snapshot() {
    let prefs = plain_prefs();
    prefs.put("user_a", 1i32).await.unwrap();

    let query = prefs.query_values::<i32>().starts_with("user_");
    let mut results = query.observe();
    assert_eq!(results.next().await.unwrap().unwrap().len(), 1);

    prefs.put("user_b", 2i32).await.unwrap();
    assert_eq!(results.next().await.unwrap().unwrap().len(), 2);

    // Results are not monotonic: removals shrink the next pass.
    prefs.remove("user_a").await.unwrap();
    let pass = results.next().await.unwrap().unwrap();
    assert_eq!(pass.len(), 1);
    assert_eq!(pass[0].key, "user_b");
}

#[tokio::test]
async fn dropping_a_stream_cancels_observation() {
    let prefs = plain_prefs();
    prefs.put("k", 1i32).await.unwrap();

    let mut results = prefs.query_keys().observe_keys();
    assert_eq!(results.next().await.unwrap().unwrap(), vec!["k"]);
    drop(results);

    // The store keeps working after the subscriber is gone.
    prefs.put("k2", 2i32).await.unwrap();
    assert_eq!(prefs.keys().await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_queries_share_one_store_safely() {
    let prefs = plain_prefs();
    for i in 0..20 {
        prefs.put(&format!("k_{i:02}"), i as i64).await.unwrap();
    }

    let evens = prefs
        .query_values::<i64>()
        .filter_value(|_, v| v % 2 == 0);
    let odds = prefs
        .query_values::<i64>()
        .filter_value(|_, v| v % 2 == 1);

    let (evens, odds) = tokio::join!(evens.execute(), odds.execute());
    assert_eq!(evens.unwrap().len(), 10);
    assert_eq!(odds.unwrap().len(), 10);
}
