use anyhow::Result;
use tempfile::tempdir;

use indico_store::categories::{Category, CategoryStore, MeetingList, MeetingListRef};
use indico_store::storage::Preferences;

fn store_at(dir: &std::path::Path) -> CategoryStore {
    CategoryStore::new(Preferences::new(dir.join("preferences.json")))
}

#[test]
fn fresh_store_loads_empty() -> Result<()> {
    let tmp = tempdir()?;
    assert!(store_at(tmp.path()).load_categories()?.is_empty());
    Ok(())
}

#[test]
fn saving_empty_collection_loads_empty() -> Result<()> {
    let tmp = tempdir()?;
    let store = store_at(tmp.path());

    store.save_categories(&[])?;
    assert_eq!(store.load_categories()?, Vec::<Category>::new());
    Ok(())
}

#[test]
fn single_category_keeps_its_variant() -> Result<()> {
    let tmp = tempdir()?;
    let store = store_at(tmp.path());

    let reference = MeetingListRef::Category {
        server: "indico.example.org".to_string(),
        category_id: "2l132".to_string(),
    };
    store.save_categories(&[Category::new("hi", false, reference.clone())])?;

    // A new store instance reads what the previous one wrote
    let loaded = store_at(tmp.path()).load_categories()?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].category_title, "hi");
    assert!(!loaded[0].display_on_home_page);

    match &loaded[0].meeting_list_ref {
        MeetingListRef::Category {
            server,
            category_id,
        } => {
            assert_eq!(server, "indico.example.org");
            assert_eq!(category_id, "2l132");
        }
        other => panic!("variant changed on load: {:?}", other),
    }
    assert_eq!(loaded[0].meeting_list_ref.server(), Some("indico.example.org"));
    assert_eq!(loaded[0].meeting_list_ref, reference);

    Ok(())
}

#[test]
fn second_save_replaces_first() -> Result<()> {
    let tmp = tempdir()?;
    let store = store_at(tmp.path());

    store.save_categories(&[
        Category::new("one", true, MeetingListRef::Favorites),
        Category::new(
            "two",
            false,
            MeetingListRef::Url {
                url: "https://indico.example.org/category/4/".to_string(),
            },
        ),
    ])?;

    let second = vec![Category::new(
        "three",
        true,
        MeetingListRef::Search {
            server: "indico.example.org".to_string(),
            query: "calorimeter".to_string(),
        },
    )];
    store.save_categories(&second)?;

    assert_eq!(store.load_categories()?, second);
    Ok(())
}

#[test]
fn corrupt_preferences_file_loads_empty() -> Result<()> {
    let tmp = tempdir()?;
    std::fs::write(tmp.path().join("preferences.json"), b"\x00\x01 not json")?;

    let store = store_at(tmp.path());
    assert!(store.load_categories()?.is_empty());

    store.save_categories(&[Category::new("fresh", true, MeetingListRef::Favorites)])?;
    assert_eq!(store.load_categories()?.len(), 1);
    Ok(())
}

#[test]
fn other_preferences_survive_category_saves() -> Result<()> {
    let tmp = tempdir()?;
    let prefs = Preferences::new(tmp.path().join("preferences.json"));
    prefs.set("lastServer", serde_json::json!("indico.example.org"))?;

    let store = CategoryStore::new(prefs.clone());
    store.save_categories(&[Category::new("x", false, MeetingListRef::Favorites)])?;
    store.clear()?;

    assert_eq!(
        prefs.get("lastServer")?,
        Some(serde_json::json!("indico.example.org"))
    );
    Ok(())
}
