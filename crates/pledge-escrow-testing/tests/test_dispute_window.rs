use pledge_escrow::{ErrorCode, ErrorKind, ONE_USDC};
use pledge_escrow_testing::{deterministic_address, CampaignSnapshot, FixtureStage, TestFixture};

/// Test the bounded window for disputes after the deadline
///
/// **Test flow:**
/// 1. Dispute at `end_date + window - 1` → accepted
/// 2. Dispute at `end_date + window` → DisputeWindowClosed
/// 3. Over-long reasons are rejected
#[tokio::test]
async fn test_dispute_window() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::DeadlinePassed).await;
    let window = test.factory.config().dispute_window_secs;
    let max_reason_len = test.factory.config().max_reason_len;

    let disputer = deterministic_address("disputer_1");
    test.fund(&disputer, 10 * ONE_USDC);

    // 1. Last second of the window
    test.warp_to(test.end_date + window - 1);
    test.try_dispute(&disputer, ONE_USDC, "late but valid")
        .await
        .expect("Dispute inside the window should succeed");

    // 3. Reason length
    let err = test
        .try_dispute(&disputer, ONE_USDC, &"x".repeat(max_reason_len + 1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ReasonTooLong));
    assert_eq!(err.kind(), Some(ErrorKind::Validation));

    test.try_dispute(&disputer, ONE_USDC, &"x".repeat(max_reason_len))
        .await
        .expect("Reason at the maximum length is accepted");

    // 2. Window closed
    test.warp_to(test.end_date + window);
    let before = CampaignSnapshot::capture_with_actors(&test, &[disputer]).await;
    let err = test.try_dispute(&disputer, ONE_USDC, "").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DisputeWindowClosed));
    assert_eq!(err.kind(), Some(ErrorKind::Temporal));
    assert_eq!(before, CampaignSnapshot::capture_with_actors(&test, &[disputer]).await);

    println!("✅ Dispute window enforced");
}

/// Disputes are never accepted once the campaign is finalized
#[tokio::test]
async fn test_dispute_after_finalization() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::DeadlinePassed).await;
    test.try_verify(true).await.unwrap();

    let disputer = deterministic_address("disputer_1");
    test.fund(&disputer, ONE_USDC);
    let err = test.try_dispute(&disputer, ONE_USDC, "").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AlreadyFinalized));
    assert_eq!(test.balance_of(&disputer), ONE_USDC);
}
