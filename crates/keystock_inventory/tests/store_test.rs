//! Tests for the key store and its stock file.

use keystock_error::InventoryErrorKind;
use keystock_inventory::{Durability, Inventory, KeyStore, Tier, decode, encode, load, save};
use tempfile::TempDir;

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_missing_file_loads_empty_inventory() {
    let dir = TempDir::new().unwrap();
    let inventory = load(&dir.path().join("stock.json")).await;
    assert_eq!(inventory, Inventory::new());
}

#[tokio::test]
async fn test_add_round_trips_through_stock_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.json");

    let store = KeyStore::open(&path).await;
    store.add(Tier::Week, keys(&["W1"])).await;
    let added = store.add(Tier::Week, keys(&["W2", "W3"])).await;
    assert_eq!(*added.value(), 2);
    assert!(added.durability().is_persisted());

    let reloaded = load(&path).await;
    assert_eq!(reloaded, store.snapshot().await);
    assert_eq!(reloaded.keys(Tier::Week), keys(&["W1", "W2", "W3"]).as_slice());
}

#[tokio::test]
async fn test_upload_then_gen_scenario() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.json");
    let store = KeyStore::open(&path).await;

    store.add(Tier::Day, keys(&["A1", "A2"])).await;
    let (issued, durability) = store.take(Tier::Day, 1).await.unwrap().into_parts();

    assert_eq!(issued, keys(&["A1"]));
    assert!(durability.is_persisted());
    assert_eq!(store.snapshot().await.keys(Tier::Day), keys(&["A2"]).as_slice());
    assert_eq!(load(&path).await.keys(Tier::Day), keys(&["A2"]).as_slice());
}

#[tokio::test]
async fn test_insufficient_stock_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.json");
    let store = KeyStore::open(&path).await;
    store.add(Tier::Day, keys(&["A1", "A2"])).await;

    std::fs::remove_file(&path).unwrap();

    let err = store.take(Tier::Day, 3).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        InventoryErrorKind::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        }
    ));
    assert_eq!(store.snapshot().await.keys(Tier::Day), keys(&["A1", "A2"]).as_slice());
    assert!(!path.exists(), "rejected take must not write the stock file");
}

#[tokio::test]
async fn test_take_then_return_restores_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.json");
    let store = KeyStore::open(&path).await;
    store.add(Tier::Month, keys(&["M1", "M2", "M3", "M4"])).await;
    let before = store.snapshot().await;

    let (taken, _) = store.take(Tier::Month, 3).await.unwrap().into_parts();
    let durability = store.return_to_front(Tier::Month, taken).await;

    assert!(durability.is_persisted());
    assert_eq!(store.snapshot().await, before);
    assert_eq!(load(&path).await, before);
}

#[tokio::test]
async fn test_reservation_restore_and_release() {
    let dir = TempDir::new().unwrap();
    let store = KeyStore::open(dir.path().join("stock.json")).await;
    store.add(Tier::Lifetime, keys(&["L1", "L2", "L3"])).await;

    let reservation = store.reserve(Tier::Lifetime, 2).await.unwrap();
    assert_eq!(reservation.keys(), keys(&["L1", "L2"]).as_slice());
    assert_eq!(reservation.tier(), Tier::Lifetime);
    assert!(reservation.restore().await.is_persisted());
    assert_eq!(
        store.snapshot().await.keys(Tier::Lifetime),
        keys(&["L1", "L2", "L3"]).as_slice()
    );

    let reservation = store.reserve(Tier::Lifetime, 1).await.unwrap();
    assert_eq!(reservation.release(), keys(&["L1"]));
    assert_eq!(
        store.snapshot().await.keys(Tier::Lifetime),
        keys(&["L2", "L3"]).as_slice()
    );
}

#[tokio::test]
async fn test_reservation_blocks_other_mutations() {
    let dir = TempDir::new().unwrap();
    let store = KeyStore::open(dir.path().join("stock.json")).await;
    store.add(Tier::Day, keys(&["D1", "D2"])).await;

    let reservation = store.reserve(Tier::Day, 1).await.unwrap();

    let other = store.clone();
    let pending = tokio::spawn(async move { other.take(Tier::Day, 1).await });
    tokio::task::yield_now().await;
    assert!(!pending.is_finished());

    reservation.restore().await;
    let (taken, _) = pending.await.unwrap().unwrap().into_parts();
    assert_eq!(taken, keys(&["D1"]));
}

#[tokio::test]
async fn test_save_failure_is_reported_as_memory_only() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();
    let store = KeyStore::open(blocker.join("stock.json")).await;

    let added = store.add(Tier::Day, keys(&["A1"])).await;

    assert!(matches!(added.durability(), Durability::MemoryOnly(_)));
    assert_eq!(store.snapshot().await.len(Tier::Day), 1);
}

#[tokio::test]
async fn test_corrupt_stock_file_is_moved_aside() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.json");
    let truncated = r#"{"version":1,"tiers":{"day":["A1""#;
    std::fs::write(&path, truncated).unwrap();

    let inventory = load(&path).await;

    assert!(inventory.is_empty());
    assert!(!path.exists());
    let backup = dir.path().join("stock.json.corrupt");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), truncated);
}

#[tokio::test]
async fn test_line_layout_at_stock_path_is_converted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.txt");
    let original = "day\nA1\nA2\nweek\nmonth\nlifetime\nL1\n";
    std::fs::write(&path, original).unwrap();

    let store = KeyStore::open_with_legacy(&path, Some(path.as_path())).await;

    let inventory = store.snapshot().await;
    assert_eq!(inventory.keys(Tier::Day), keys(&["A1", "A2"]).as_slice());
    assert_eq!(inventory.keys(Tier::Lifetime), keys(&["L1"]).as_slice());
    assert!(!dir.path().join("stock.txt.corrupt").exists());

    let backup = dir.path().join("stock.txt.legacy");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), original);
    let rewritten = std::fs::read_to_string(&path).unwrap();
    assert_eq!(decode(&rewritten).unwrap(), inventory);
}

#[tokio::test]
async fn test_legacy_stock_is_imported_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.json");
    let legacy = dir.path().join("stock.txt");
    std::fs::write(&legacy, "day\nA1\nA2\nweek\nmonth\nM1\nlifetime\n").unwrap();

    let store = KeyStore::open_with_legacy(&path, Some(legacy.as_path())).await;
    let inventory = store.snapshot().await;
    assert_eq!(inventory.keys(Tier::Day), keys(&["A1", "A2"]).as_slice());
    assert_eq!(inventory.keys(Tier::Month), keys(&["M1"]).as_slice());
    assert_eq!(load(&path).await, inventory);

    // Once the JSON file exists the legacy file is no longer consulted.
    store.take(Tier::Day, 2).await.unwrap();
    let reopened = KeyStore::open_with_legacy(&path, Some(legacy.as_path())).await;
    assert_eq!(reopened.snapshot().await.len(Tier::Day), 0);
}

#[tokio::test]
async fn test_keys_that_collide_with_legacy_syntax_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stock.json");
    let mut inventory = Inventory::new();
    inventory.append(Tier::Day, keys(&["week", "multi\nline", "  padded  "]));

    assert!(save(&path, &inventory).await.is_persisted());
    assert_eq!(load(&path).await, inventory);
    assert_eq!(decode(&encode(&inventory).unwrap()).unwrap(), inventory);
}

#[tokio::test]
async fn test_partition_known_keeps_input_order() {
    let dir = TempDir::new().unwrap();
    let store = KeyStore::open(dir.path().join("stock.json")).await;
    store.add(Tier::Day, keys(&["A1"])).await;
    store.add(Tier::Lifetime, keys(&["L1"])).await;

    let (known, unknown) = store
        .partition_known(&keys(&["L1", "nope", "A1", "gone"]))
        .await;
    assert_eq!(known, keys(&["L1", "A1"]));
    assert_eq!(unknown, keys(&["nope", "gone"]));
}
