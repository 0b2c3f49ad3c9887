//! Integration tests for the trade lifecycle.
//!
//! Submission through the standard validator chain, version history in the
//! in-memory repository, and the scheduled expiry process.

use std::sync::Arc;
use std::time::Duration;

use trade_store::{
    CreateTradeCommand, EpochMillis, InMemoryTradeRepository, RepositoryError, SubmitOutcome,
    Timestamp, Trade, TradeError, TradeRepository, TradeService, TradeServiceError,
    ValidationError, ValidatorChain,
};

const DAY_MS: EpochMillis = 86_400_000;

fn trade(id: &str, version: i32, book: &str, maturity: EpochMillis) -> Trade {
    Trade::create(CreateTradeCommand {
        id: id.to_string(),
        version,
        counterparty_id: "CP-1".to_string(),
        book_id: book.to_string(),
        created_timestamp: Timestamp::now_millis(),
        maturity_timestamp: maturity,
        expired: false,
    })
    .unwrap()
}

fn standard_service() -> TradeService<InMemoryTradeRepository> {
    TradeService::new(
        Arc::new(InMemoryTradeRepository::new()),
        ValidatorChain::standard(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_expiry_flags_only_trades_near_maturity() {
    let service = standard_service();
    let now = Timestamp::now_millis();

    service.submit(trade("T1", 1, "B1", now + DAY_MS)).unwrap();
    service.submit(trade("T1", 2, "B1", now + 5_000)).unwrap();

    let latest = service.repository().latest_version("T1").unwrap();
    assert_eq!(latest.version(), 2);

    service
        .start_expiry_process(Duration::from_secs(1), Duration::from_secs(10))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let trades = service.list_trades();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].version(), 2);
    assert!(trades[0].is_expired());
    assert_eq!(trades[1].version(), 1);
    assert!(!trades[1].is_expired());

    service.stop_expiry_process().await;
    assert!(!service.is_expiry_running().await);
}

#[test]
fn test_same_version_resubmission_replaces_payload() {
    let service = standard_service();
    let now = Timestamp::now_millis();

    let first = service.submit(trade("T2", 1, "B1", now + 20_000)).unwrap();
    let resubmitted = Trade::create(CreateTradeCommand {
        id: "T2".to_string(),
        version: 1,
        counterparty_id: "CP-2".to_string(),
        book_id: "B2".to_string(),
        created_timestamp: now + 1,
        maturity_timestamp: now + DAY_MS,
        expired: false,
    })
    .unwrap();
    let second = service.submit(resubmitted.clone()).unwrap();

    assert_eq!(first, SubmitOutcome::Added);
    assert_eq!(second, SubmitOutcome::Replaced);

    let trades = service.list_trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].counterparty_id(), "CP-2");
    assert_eq!(trades[0].book_id(), "B2");
    assert_eq!(trades[0].created_timestamp(), now + 1);
    assert_eq!(trades[0].maturity_timestamp(), now + DAY_MS);
    assert_eq!(trades[0], resubmitted);
}

#[test]
fn test_lower_version_is_rejected() {
    let service = standard_service();
    let maturity = Timestamp::now_millis() + DAY_MS;

    service.submit(trade("T3", 2, "B1", maturity)).unwrap();
    let err = service.submit(trade("T3", 1, "B1", maturity)).unwrap_err();

    assert!(matches!(
        err,
        TradeServiceError::Validation(ValidationError::VersionTooLow {
            submitted: 1,
            existing: 2,
            ..
        })
    ));

    let trades = service.list_trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].version(), 2);
}

#[test]
fn test_empty_id_is_rejected_at_construction() {
    let err = Trade::create(CreateTradeCommand {
        id: String::new(),
        version: 1,
        maturity_timestamp: Timestamp::now_millis() + DAY_MS,
        ..Default::default()
    })
    .unwrap_err();

    assert!(matches!(err, TradeError::InvalidArgument { .. }));
}

#[test]
fn test_past_maturity_is_rejected() {
    let service = standard_service();
    let err = service
        .submit(trade("T4", 1, "B1", Timestamp::now_millis() - DAY_MS))
        .unwrap_err();

    assert!(matches!(
        err,
        TradeServiceError::Validation(ValidationError::MaturityTooEarly { .. })
    ));
    assert!(service.repository().is_empty());
}

#[test]
fn test_listing_is_id_ascending_version_descending() {
    let service = standard_service();
    let maturity = Timestamp::now_millis() + DAY_MS;

    for (id, version) in [("B", 1), ("A", 1), ("B", 3), ("A", 2), ("C", 7)] {
        service.submit(trade(id, version, "B1", maturity)).unwrap();
    }

    let order: Vec<(String, i32)> = service
        .list_trades()
        .iter()
        .map(|t| (t.id().to_string(), t.version()))
        .collect();
    assert_eq!(
        order,
        [
            ("A".to_string(), 2),
            ("A".to_string(), 1),
            ("B".to_string(), 3),
            ("B".to_string(), 1),
            ("C".to_string(), 7),
        ]
    );
}

#[test]
fn test_concurrent_submissions_keep_store_consistent() {
    let service = standard_service();
    let maturity = Timestamp::now_millis() + DAY_MS;

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let service = &service;
            scope.spawn(move || {
                for version in 1..=25 {
                    let id = format!("W{worker}");
                    service.submit(trade(&id, version, "B1", maturity)).unwrap();

                    // Every worker also races on one shared key.
                    match service.submit(trade("SHARED", 1, "B1", maturity)) {
                        Ok(_)
                        | Err(TradeServiceError::Repository(
                            RepositoryError::DuplicateTrade { .. },
                        )) => {}
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            });
        }
    });

    let trades = service.list_trades();
    assert_eq!(trades.len(), 8 * 25 + 1);
    assert_eq!(trades.iter().filter(|t| t.id() == "SHARED").count(), 1);
    for worker in 0..8 {
        let latest = service
            .repository()
            .latest_version(&format!("W{worker}"))
            .unwrap();
        assert_eq!(latest.version(), 25);
    }
    assert!(trades.windows(2).all(|w| w[0].key() < w[1].key()));
}

#[tokio::test]
async fn test_expiry_process_restart_and_manual_run() {
    let service = standard_service();
    let now = Timestamp::now_millis();
    service.submit(trade("T5", 1, "B1", now + 10_000)).unwrap();

    service
        .start_expiry_process(Duration::from_secs(3600), Duration::from_secs(3600))
        .await
        .unwrap();
    service
        .start_expiry_process(Duration::from_secs(3600), Duration::from_secs(3600))
        .await
        .unwrap();
    assert!(service.is_expiry_running().await);

    assert_eq!(service.run_expiry_once(), 1);
    assert!(service.list_trades()[0].is_expired());

    service.stop_expiry_process().await;
    assert!(!service.is_expiry_running().await);
}
