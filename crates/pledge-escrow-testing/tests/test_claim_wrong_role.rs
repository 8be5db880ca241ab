use pledge_escrow::{ClaimRole, ErrorCode, ErrorKind};
use pledge_escrow_testing::{deterministic_address, CampaignSnapshot, FixtureStage, TestFixture};

/// Test claims made under a role the caller does not hold
///
/// **Test flow:**
/// 1. Finalize with success
/// 2. Stranger claims as creator / treasury → authorization errors
/// 3. Parties without a stake in the role → No* errors
/// 4. No state changes
#[tokio::test]
async fn test_claim_wrong_role() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::DeadlinePassed).await;
    test.try_verify(true).await.unwrap();

    let stranger = deterministic_address("stranger");
    let pledger = deterministic_address("pledger_1");
    let voucher = deterministic_address("voucher_1");
    let before = CampaignSnapshot::capture_with_actors(&test, &[stranger, pledger, voucher]).await;

    // 2. Authorization
    let err = test.try_claim(&stranger, ClaimRole::Creator).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotCreator));
    assert_eq!(err.kind(), Some(ErrorKind::Authorization));
    let err = test.try_claim(&stranger, ClaimRole::Treasury).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotTreasury));
    let err = test.try_claim(&pledger, ClaimRole::Creator).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotCreator));

    // 3. No stake under that role
    let err = test.try_claim(&voucher, ClaimRole::Disputer).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NoDispute));
    let err = test.try_claim(&pledger, ClaimRole::Voucher).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NoVouch));
    let err = test.try_claim(&stranger, ClaimRole::Voucher).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NoVouch));

    // 4. Nothing moved
    assert_eq!(
        before,
        CampaignSnapshot::capture_with_actors(&test, &[stranger, pledger, voucher]).await
    );
}

/// A pledger with no pledge on a failed campaign has nothing to refund
#[tokio::test]
async fn test_claim_refund_without_pledge() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::DeadlinePassed).await;
    test.try_verify(false).await.unwrap();

    let err = test
        .try_claim(&deterministic_address("stranger"), ClaimRole::Pledger)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NoPledge));
}
