use pledge_escrow::{CampaignStatus, ErrorKind, TokenLedger, ONE_USDC};
use pledge_escrow_testing::{deterministic_address, CampaignSnapshot, FixtureStage, TestFixture};

/// Test that a refused pool deposit leaves no partial custody state
///
/// **Test flow:**
/// 1. Pool starts refusing deposits
/// 2. Pledge, vouch and dispute fail with a custody error
/// 3. Ledger, balances, pool position and allowance are unchanged
/// 4. Pool recovers; the same pledge succeeds without re-approval
#[tokio::test]
async fn test_pool_deposit_failure_is_atomic() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::ContributionsPlaced).await;

    let pledger = deterministic_address("pledger_2");
    test.fund(&pledger, 50 * ONE_USDC);

    // 1. Pool down
    test.yield_pool.set_fail_deposits(true);
    let before = CampaignSnapshot::capture_with_actors(&test, &[pledger]).await;

    // 2. Every inbound operation fails
    let err = test.try_pledge(&pledger, 50 * ONE_USDC).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Custody));
    let err = test.try_vouch(&pledger, 5 * ONE_USDC).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Custody));
    let err = test
        .try_dispute(&pledger, 5 * ONE_USDC, "")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Custody));

    // 3. No trace
    let after = CampaignSnapshot::capture_with_actors(&test, &[pledger]).await;
    assert_eq!(before, after, "Failed deposits must not change state");
    assert_eq!(
        test.token.allowance(&pledger, &test.escrow_address()),
        50 * ONE_USDC
    );

    println!("✅ Deposit failures left no partial state");

    // 4. Recovery
    test.yield_pool.set_fail_deposits(false);
    test.try_pledge(&pledger, 50 * ONE_USDC).await.unwrap();
    assert_eq!(test.ledger().await.amount_pledged, 150 * ONE_USDC);
}

/// Test that a refused withdrawal aborts finalization and can be retried
#[tokio::test]
async fn test_pool_withdraw_failure_is_atomic() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::DeadlinePassed).await;

    test.yield_pool.set_fail_withdrawals(true);
    let before = CampaignSnapshot::capture_all(&test).await;

    let err = test.try_verify(true).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Custody));
    assert_eq!(before, CampaignSnapshot::capture_all(&test).await);
    assert!(!test.ledger().await.finalized);

    test.yield_pool.set_fail_withdrawals(false);
    test.try_verify(true).await.expect("Retry after pool recovers");
    assert_eq!(test.ledger().await.status, CampaignStatus::Complete);
    assert_eq!(test.balance_of(&test.escrow_address()), 130 * ONE_USDC);
}

/// Test that approval fails cleanly when the pool refuses the bond
#[tokio::test]
async fn test_pool_failure_on_approval() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::CampaignCreated).await;

    test.yield_pool.set_fail_deposits(true);
    let err = test.try_approve_campaign().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Custody));

    let ledger = test.ledger().await;
    assert_eq!(ledger.status, CampaignStatus::Draft);
    assert_eq!(ledger.deposited_principal, 0);
    assert_eq!(test.balance_of(&test.escrow_address()), 10 * ONE_USDC);
}
