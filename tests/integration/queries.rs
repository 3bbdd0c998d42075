//! Query pipelines against a live store.

use crate::common::{json_prefs, plain_prefs, seed_keys, Profile};
use prefstore::QueryExt;

#[tokio::test]
async fn key_selection_is_insertion_order_independent() {
    // Same key set, two insertion orders, identical results.
    let forward = plain_prefs();
    seed_keys(&forward, &["user_name", "user_age", "app_theme"]).await;
    let backward = plain_prefs();
    seed_keys(&backward, &["app_theme", "user_age", "user_name"]).await;

    for prefs in [&forward, &backward] {
        let keys = prefs
            .query_keys()
            .starts_with("user_")
            .execute_keys()
            .await
            .unwrap();
        assert_eq!(keys, vec!["user_age", "user_name"]);
    }
}

#[tokio::test]
async fn pagination_selects_sorted_positions() {
    let prefs = plain_prefs();
    seed_keys(&prefs, &["k4", "k0", "k3", "k1", "k2"]).await;

    let page = prefs
        .query_keys()
        .skip(2)
        .take(2)
        .execute_keys()
        .await
        .unwrap();
    assert_eq!(page, vec!["k2", "k3"]);
}

#[tokio::test]
async fn wildcard_patterns_select_keys() {
    let prefs = plain_prefs();
    seed_keys(
        &prefs,
        &["user_profile_name", "user_profile_email", "user_age", "app_user"],
    )
    .await;

    assert_eq!(
        prefs
            .query_keys()
            .matches("user_*_*")
            .execute_keys()
            .await
            .unwrap(),
        vec!["user_profile_email", "user_profile_name"]
    );
    assert_eq!(
        prefs
            .query_keys()
            .matches("*user*")
            .execute_keys()
            .await
            .unwrap()
            .len(),
        4
    );
}

#[tokio::test]
async fn value_query_full_pipeline() {
    let prefs = plain_prefs();
    prefs.put("score_a", 30i32).await.unwrap();
    prefs.put("score_b", 10i32).await.unwrap();
    prefs.put("score_c", 20i32).await.unwrap();
    prefs.put("score_d", 40i32).await.unwrap();
    prefs.put("label", "x".to_string()).await.unwrap();

    let entries = prefs
        .query_values::<i32>()
        .starts_with("score_")
        .filter_value(|_, v| *v >= 20)
        .sort_by_value_descending()
        .skip(1)
        .take(2)
        .execute()
        .await
        .unwrap();

    let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    let values: Vec<i32> = entries.iter().map(|e| e.value).collect();
    assert_eq!(keys, vec!["score_a", "score_c"]);
    assert_eq!(values, vec![30, 20]);
}

#[tokio::test]
async fn value_sort_ties_break_by_key_ascending() {
    let prefs = plain_prefs();
    prefs.put("z", 1i32).await.unwrap();
    prefs.put("a", 1i32).await.unwrap();
    prefs.put("m", 1i32).await.unwrap();

    let query = prefs
        .query_values::<i32>()
        .sort_by_value_ascending_with(|x, y| x.cmp(y));
    let first = query.execute_keys().await.unwrap();
    assert_eq!(first, vec!["a", "m", "z"]);
    // Deterministic across repeated executions.
    for _ in 0..3 {
        assert_eq!(query.execute_keys().await.unwrap(), first);
    }
}

#[tokio::test]
async fn map_projection_associates_uniquely() {
    let prefs = plain_prefs();
    prefs.put("a", 1i64).await.unwrap();
    prefs.put("b", 2i64).await.unwrap();

    let map = prefs.query_values::<i64>().execute_map().await.unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a"), Some(&1));
    assert_eq!(map.get("b"), Some(&2));
}

#[tokio::test]
async fn object_query_sorts_on_decoded_content() {
    let prefs = json_prefs();
    prefs
        .put_object("p_old", &Profile::named("Eve", 71))
        .await
        .unwrap();
    prefs
        .put_object("p_young", &Profile::named("Bob", 19))
        .await
        .unwrap();

    let names: Vec<String> = prefs
        .query_objects::<Profile>()
        .unwrap()
        .starts_with("p_")
        .sort_by_value_ascending_with(|a, b| a.age.cmp(&b.age))
        .execute_values()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Bob", "Eve"]);
}
