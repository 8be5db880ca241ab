use futures::future::join_all;
use pledge_escrow::{TokenLedger, ONE_USDC};
use pledge_escrow_factory::CreateCampaignArgs;
use pledge_escrow_testing::{deterministic_address, FixtureStage, TestFixture};

/// Test concurrent operations across and within campaigns
///
/// **Test flow:**
/// 1. Four creators open campaigns concurrently → ids 1..=4, no gaps
/// 2. Each campaign receives eight concurrent pledges
/// 3. Per-campaign totals equal the sum of accepted pledges
#[tokio::test]
async fn test_concurrent_campaigns() {
    let test = TestFixture::new();
    let factory_address = test.factory.address();

    // 1. Concurrent creation
    let creators: Vec<_> = (0..4)
        .map(|i| deterministic_address(&format!("creator_{i}")))
        .collect();
    for creator in &creators {
        test.mint_to(creator, 10 * ONE_USDC);
        test.token
            .approve(creator, &factory_address, 10 * ONE_USDC)
            .unwrap();
    }

    let results = join_all(creators.iter().map(|creator| {
        test.factory.create_campaign(
            *creator,
            CreateCampaignArgs {
                end_date: test.end_date,
                prompt_hash: test.prompt_hash(),
                fundraising_goal: 0,
                bond_amount: 10 * ONE_USDC,
                privacy_mode: false,
            },
        )
    }))
    .await;

    let mut ids: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let mut handles = Vec::new();
    for creator in &creators {
        let id = test.factory.campaigns_by_creator(creator).await[0];
        let handle = test.factory.campaign(id).await.unwrap();
        handle.approve_campaign(*creator).await.unwrap();
        handles.push(handle);
    }

    // 2. Concurrent pledges
    let mut pledges = Vec::new();
    for handle in &handles {
        for p in 0..8u64 {
            let pledger = deterministic_address(&format!("pledger_{}_{p}", handle.id()));
            let amount = (p + 1) * ONE_USDC;
            test.mint_to(&pledger, amount);
            test.token
                .approve(&pledger, &handle.address(), amount)
                .unwrap();
            pledges.push((handle.clone(), pledger, amount));
        }
    }

    let results = join_all(
        pledges
            .iter()
            .map(|(handle, pledger, amount)| handle.pledge(*pledger, *amount)),
    )
    .await;
    assert!(results.iter().all(|r| r.is_ok()));

    // 3. Totals
    for handle in &handles {
        let ledger = handle.ledger().await;
        assert_eq!(ledger.amount_pledged, 36 * ONE_USDC);
        assert_eq!(ledger.pledges.len(), 8);
        assert_eq!(ledger.deposited_principal, 46 * ONE_USDC);
    }

    println!("✅ Four campaigns processed concurrently");
}

/// Test that concurrent emergency finalizations resolve to exactly one winner
#[tokio::test]
async fn test_concurrent_emergency_finalize() {
    let mut test = TestFixture::new();
    test.jump_to(FixtureStage::DeadlinePassed).await;
    test.advance_time_by(test.factory.config().grace_period_secs);

    let campaign = test.campaign().await;
    let keepers: Vec<_> = (0..6)
        .map(|i| deterministic_address(&format!("keeper_{i}")))
        .collect();

    let results = join_all(keepers.iter().map(|k| campaign.emergency_finalize(*k))).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    let finalized_events = test
        .events()
        .into_iter()
        .filter(|e| e.name() == "CampaignFinalized")
        .count();
    assert_eq!(finalized_events, 1);
}
