use anyhow::Result;
use fitness_tracker::errors::TrackerError;
use fitness_tracker::profile::Profile;
use fitness_tracker::store::{ProfileMap, ProfileStore};
use tempfile::TempDir;

fn sample_profile(city: &str) -> Profile {
    Profile {
        weight: 70.0,
        height: 175.0,
        age: 25,
        activity: 60,
        city: city.to_string(),
        temperature: 30.0,
        water_goal: 2600,
        water_curr: 2600,
        calorie_goal: 1668,
        calorie_curr: 1668,
        calorie_burned: None,
    }
}

fn temp_store() -> Result<(TempDir, ProfileStore)> {
    let dir = TempDir::new()?;
    let store = ProfileStore::new(dir.path().join("user_infos.json"));
    Ok((dir, store))
}

#[tokio::test]
async fn test_missing_file_loads_empty() -> Result<()> {
    let (_dir, store) = temp_store()?;
    assert!(store.load().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_file_loads_empty() -> Result<()> {
    let (_dir, store) = temp_store()?;
    tokio::fs::write(store.path(), "{not json").await?;
    assert!(store.load().await.is_empty());

    tokio::fs::write(store.path(), "[1, 2, 3]").await?;
    assert!(store.load().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_bad_record_does_not_hide_valid_ones() -> Result<()> {
    let (_dir, store) = temp_store()?;
    let mut profiles = ProfileMap::new();
    profiles.insert("1".to_string(), sample_profile("Moscow"));
    store.save(&profiles).await?;

    // answers stored as text, and a record that is not an object at all
    let content = tokio::fs::read_to_string(store.path()).await?;
    let mut raw: serde_json::Value = serde_json::from_str(&content)?;
    let bad = serde_json::json!({"weight": "70", "city": "B"});
    raw["2"] = bad.clone();
    raw["4"] = serde_json::json!(17);
    tokio::fs::write(store.path(), serde_json::to_string(&raw)?).await?;

    assert_eq!(store.get("1").await?.city, "Moscow");
    assert!(matches!(store.get("2").await, Err(TrackerError::NotFound(_))));
    assert_eq!(store.load().await.len(), 1);

    store.replace("3", sample_profile("Kazan")).await?;
    store
        .update("1", |p| {
            p.log_water(250)?;
            Ok(())
        })
        .await?;

    let content = tokio::fs::read_to_string(store.path()).await?;
    let written: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(written["2"], bad);
    assert_eq!(written["4"], serde_json::json!(17));
    assert_eq!(written["1"]["water_curr"], 2350);
    assert_eq!(written["3"]["city"], "Kazan");

    let profiles = store.load().await;
    assert_eq!(profiles.keys().collect::<Vec<_>>(), vec!["1", "3"]);
    Ok(())
}

#[tokio::test]
async fn test_update_on_unreadable_record_is_not_found() -> Result<()> {
    let (_dir, store) = temp_store()?;
    tokio::fs::write(store.path(), r#"{"2": {"weight": "70", "city": "B"}}"#).await?;
    let before = tokio::fs::read_to_string(store.path()).await?;

    let result = store
        .update("2", |p| {
            p.reset();
            Ok(())
        })
        .await;
    assert!(matches!(result, Err(TrackerError::NotFound(_))));
    assert_eq!(tokio::fs::read_to_string(store.path()).await?, before);
    Ok(())
}

#[tokio::test]
async fn test_failed_mutation_leaves_file_untouched() -> Result<()> {
    let (_dir, store) = temp_store()?;
    store.replace("1", sample_profile("Moscow")).await?;
    let before = tokio::fs::read_to_string(store.path()).await?;

    let result = store.update("1", |p| p.log_water(i64::MIN)).await;
    assert!(matches!(result, Err(TrackerError::OutOfRange(_))));
    assert_eq!(tokio::fs::read_to_string(store.path()).await?, before);
    Ok(())
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() -> Result<()> {
    let (_dir, store) = temp_store()?;
    store.replace("1", sample_profile("Moscow")).await?;

    match store.get("2").await {
        Err(TrackerError::NotFound(user_id)) => assert_eq!(user_id, "2"),
        other => panic!("Expected NotFound, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_replace_is_full_overwrite() -> Result<()> {
    let (_dir, store) = temp_store()?;
    let mut first = sample_profile("Moscow");
    first.calorie_burned = Some(500);
    store.replace("7", first).await?;

    store.replace("7", sample_profile("Kazan")).await?;

    let profile = store.get("7").await?;
    assert_eq!(profile.city, "Kazan");
    assert_eq!(profile.calorie_burned, None);
    Ok(())
}

#[tokio::test]
async fn test_update_persists_and_keeps_other_users() -> Result<()> {
    let (_dir, store) = temp_store()?;
    store.replace("1", sample_profile("Moscow")).await?;
    store.replace("2", sample_profile("Dubai")).await?;

    let remaining = store
        .update("1", |p| {
            p.log_water(500)?;
            Ok(p.water_curr)
        })
        .await?;
    assert_eq!(remaining, 2100);

    let profiles = store.load().await;
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles["1"].water_curr, 2100);
    assert_eq!(profiles["2"].water_curr, 2600);
    Ok(())
}

#[tokio::test]
async fn test_update_missing_user_leaves_file_untouched() -> Result<()> {
    let (_dir, store) = temp_store()?;
    store.replace("1", sample_profile("Moscow")).await?;
    let before = tokio::fs::read_to_string(store.path()).await?;

    let result = store
        .update("99", |p| {
            p.reset();
            Ok(())
        })
        .await;
    assert!(matches!(result, Err(TrackerError::NotFound(_))));

    let after = tokio::fs::read_to_string(store.path()).await?;
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn test_save_load_round_trip_is_noop() -> Result<()> {
    let (_dir, store) = temp_store()?;
    let mut profiles = ProfileMap::new();
    profiles.insert("1".to_string(), sample_profile("Москва"));
    let mut burned = sample_profile("Dubai");
    burned.calorie_burned = Some(225);
    profiles.insert("2".to_string(), burned);
    store.save(&profiles).await?;

    let before = tokio::fs::read_to_string(store.path()).await?;
    let loaded = store.load().await;
    store.save(&loaded).await?;
    let after = tokio::fs::read_to_string(store.path()).await?;

    assert_eq!(loaded, profiles);
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn test_non_ascii_is_written_literally() -> Result<()> {
    let (_dir, store) = temp_store()?;
    store.replace("1", sample_profile("Санкт-Петербург")).await?;

    let content = tokio::fs::read_to_string(store.path()).await?;
    assert!(content.contains("Санкт-Петербург"));
    assert!(!content.contains("\\u"));
    Ok(())
}

#[tokio::test]
async fn test_reads_file_written_by_hand() -> Result<()> {
    let (_dir, store) = temp_store()?;
    let content = r#"{"123456": {"weight": 80, "height": 180, "age": 30, "activity": 45,
        "city": "London", "temperature": 12.5, "water_goal": 3400, "water_curr": 1200,
        "calorie_goal": 1975, "calorie_curr": 900, "calorie_burned": 300}}"#;
    tokio::fs::write(store.path(), content).await?;

    let profile = store.get("123456").await?;
    assert_eq!(profile.weight, 80.0);
    assert_eq!(profile.water_consumed(), 2200);
    assert_eq!(profile.calories_burned(), 300);
    Ok(())
}
