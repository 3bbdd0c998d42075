//! Facade-level flows exercising the whole stack.

use crate::common::{json_prefs, plain_prefs, Profile};
use prefstore::{AggregateExt, QueryExt};
use std::collections::BTreeSet;

#[tokio::test]
async fn put_count_contains_remove() {
    let prefs = plain_prefs();
    prefs.put("age", 25i32).await.unwrap();
    prefs.put("name", "Alice".to_string()).await.unwrap();

    assert_eq!(prefs.count().await.unwrap(), 2);
    assert!(prefs.contains_key("age").await.unwrap());

    prefs.remove("age").await.unwrap();
    assert_eq!(prefs.count().await.unwrap(), 1);
    assert!(!prefs.contains_key("age").await.unwrap());
}

#[tokio::test]
async fn all_primitive_kinds_survive_round_trips() {
    let prefs = plain_prefs();
    let set: BTreeSet<String> = ["red", "green"].iter().map(|s| s.to_string()).collect();

    prefs.put("i32", i32::MIN).await.unwrap();
    prefs.put("i64", i64::MAX).await.unwrap();
    prefs.put("f32", 1.5f32).await.unwrap();
    prefs.put("f64", -2.25f64).await.unwrap();
    prefs.put("bool", false).await.unwrap();
    prefs.put("string", "héllo".to_string()).await.unwrap();
    prefs.put("set", set.clone()).await.unwrap();

    assert_eq!(prefs.get::<i32>("i32").await.unwrap(), Some(i32::MIN));
    assert_eq!(prefs.get::<i64>("i64").await.unwrap(), Some(i64::MAX));
    assert_eq!(prefs.get::<f32>("f32").await.unwrap(), Some(1.5));
    assert_eq!(prefs.get::<f64>("f64").await.unwrap(), Some(-2.25));
    assert_eq!(prefs.get::<bool>("bool").await.unwrap(), Some(false));
    assert_eq!(
        prefs.get::<String>("string").await.unwrap(),
        Some("héllo".to_string())
    );
    assert_eq!(prefs.get::<BTreeSet<String>>("set").await.unwrap(), Some(set));
}

#[tokio::test]
async fn structured_values_flow_through_the_serializer() {
    let prefs = json_prefs();
    let profile = Profile {
        name: "Alice".into(),
        age: 30,
        tags: vec!["admin".into()],
    };
    prefs.put_object("profile_alice", &profile).await.unwrap();

    assert_eq!(
        prefs.get_object::<Profile>("profile_alice").await.unwrap(),
        Some(profile.clone())
    );

    // Structured values participate in value queries.
    let entries = prefs
        .query_objects::<Profile>()
        .unwrap()
        .starts_with("profile_")
        .execute()
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, profile);
}

#[tokio::test]
async fn clear_resets_everything() {
    let prefs = plain_prefs();
    prefs.put("a", 1i32).await.unwrap();
    prefs.put("b", 2i32).await.unwrap();
    prefs.clear().await.unwrap();
    assert_eq!(prefs.count().await.unwrap(), 0);
    assert_eq!(prefs.get::<i32>("a").await.unwrap(), None);
}

#[tokio::test]
async fn group_by_key_prefix_partitions_the_key_space() {
    let prefs = plain_prefs();
    for key in ["user_name", "user_age", "settings_theme"] {
        prefs.put(key, true).await.unwrap();
    }

    let groups = prefs.group_by_key_prefix('_').await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups.get("user").unwrap(),
        &vec!["user_age".to_string(), "user_name".to_string()]
    );
    assert_eq!(
        groups.get("settings").unwrap(),
        &vec!["settings_theme".to_string()]
    );
}
