use rust_decimal_macros::dec;
use sltp_core::{ConfigLoader, TakeProfitMode};
use sltp_manager::{Manager, MemoryCanvas, PaperHost};
use std::path::PathBuf;
use std::sync::Arc;

fn shipped(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../config")
        .join(file)
}

#[tokio::test]
async fn test_shipped_config_against_shipped_snapshot() {
    let mut config = ConfigLoader::load(shipped("Config.toml")).expect("Failed to load config");
    assert!(!config.execution.enabled);
    config.execution.enabled = true;

    let host = Arc::new(PaperHost::load(shipped("snapshot.json")).expect("Failed to load snapshot"));
    let mut manager = Manager::new(Arc::clone(&host), config, MemoryCanvas::default());
    manager.start();

    let report = manager.tick().await;
    let positions = report.positions.expect("positions listed");
    assert_eq!(positions.scanned, 3);
    assert_eq!(positions.modified, 2);
    // GBPUSD is not the chart symbol
    assert_eq!(positions.filtered, 1);
    assert!(report.pending_orders.is_none());

    let buy = host.item(1).await.unwrap();
    assert_eq!(buy.stop_loss, Some(dec!(1.1800)));
    assert_eq!(buy.take_profit, Some(dec!(1.2400)));

    // Existing SL is kept, only TP is filled in
    let sell = host.item(2).await.unwrap();
    assert_eq!(sell.stop_loss, Some(dec!(1.2100)));
    assert_eq!(sell.take_profit, Some(dec!(1.1610)));

    assert_eq!(host.item(10).await.unwrap().stop_loss, None);
    assert_eq!(manager.status().processed_positions, 2);
}

#[tokio::test]
async fn test_live_profile_includes_pending_orders() {
    let config = ConfigLoader::load_with_profile(shipped("Config.toml"), "live")
        .expect("Failed to load profile");
    assert!(config.execution.enabled);
    assert!(config.filters.apply_to_pending);
    assert_eq!(config.execution.check_interval_secs, 5);

    let host = Arc::new(PaperHost::load(shipped("snapshot.json")).expect("Failed to load snapshot"));
    let mut manager = Manager::new(Arc::clone(&host), config, MemoryCanvas::default());
    manager.start();

    let report = manager.tick().await;
    assert_eq!(report.pending_orders.expect("orders listed").modified, 1);

    let order = host.item(10).await.unwrap();
    assert_eq!(order.stop_loss, Some(dec!(1.1750)));
    assert_eq!(order.take_profit, Some(dec!(1.2350)));
    assert_eq!(order.price, dec!(1.1950));
}

#[tokio::test]
async fn test_percentage_take_profit_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("Config.toml");
    let snapshot_path = dir.path().join("snapshot.json");

    std::fs::write(
        &config_path,
        r#"
[policy.stop_loss]
value = 100

[policy.take_profit]
value = 50
mode = "percentage"

[filters]
current_symbol_only = false

[execution]
enabled = true
"#,
    )
    .unwrap();
    std::fs::write(
        &snapshot_path,
        r#"{
  "symbols": [{ "name": "GBPUSD", "pip_size": "0.0001", "bid": "1.3000", "ask": "1.3002" }],
  "positions": [{ "id": 7, "symbol": "GBPUSD", "direction": "sell", "price": "1.3000" }]
}"#,
    )
    .unwrap();

    let config = ConfigLoader::load(&config_path).unwrap();
    assert_eq!(config.policy.take_profit.mode, TakeProfitMode::Percentage);

    let host = Arc::new(PaperHost::load(&snapshot_path).unwrap());
    let mut manager = Manager::new(Arc::clone(&host), config.clone(), MemoryCanvas::default());
    manager.start();
    assert_eq!(manager.tick().await.modified(), 1);

    let sell = host.item(7).await.unwrap();
    assert_eq!(sell.stop_loss, Some(dec!(1.3100)));
    assert_eq!(sell.take_profit, Some(dec!(1.2950)));

    // Persist the book and start over with an empty ledger
    let book = host.snapshot().await;
    std::fs::write(&snapshot_path, serde_json::to_string_pretty(&book).unwrap()).unwrap();

    let restarted = Arc::new(PaperHost::load(&snapshot_path).unwrap());
    let mut manager = Manager::new(Arc::clone(&restarted), config, MemoryCanvas::default());
    manager.start();

    let report = manager.tick().await;
    assert_eq!(report.modified(), 0);
    assert_eq!(report.positions.unwrap().unchanged, 1);
    assert!(restarted.modifications().await.is_empty());
}
