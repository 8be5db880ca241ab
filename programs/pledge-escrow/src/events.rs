use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::instructions::{
    CampaignApproved, CampaignCreated, CampaignFinalized, Claimed, DisputeThresholdReached,
    Disputed, Pledged, SnapshotTaken, Vouched,
};

/// Every event a ledger or the factory emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EscrowEvent {
    CampaignCreated(CampaignCreated),
    CampaignApproved(CampaignApproved),
    Pledged(Pledged),
    Vouched(Vouched),
    Disputed(Disputed),
    SnapshotTaken(SnapshotTaken),
    DisputeThresholdReached(DisputeThresholdReached),
    CampaignFinalized(CampaignFinalized),
    Claimed(Claimed),
}

macro_rules! impl_escrow_event {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for EscrowEvent {
                fn from(event: $variant) -> Self {
                    EscrowEvent::$variant(event)
                }
            }
        )+

        impl EscrowEvent {
            pub fn campaign_id(&self) -> u64 {
                match self {
                    $(EscrowEvent::$variant(event) => event.campaign_id,)+
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(EscrowEvent::$variant(_) => stringify!($variant),)+
                }
            }
        }
    };
}

impl_escrow_event!(
    CampaignCreated,
    CampaignApproved,
    Pledged,
    Vouched,
    Disputed,
    SnapshotTaken,
    DisputeThresholdReached,
    CampaignFinalized,
    Claimed,
);

/// Append-only record of emitted events, shared by every ledger of a factory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<EscrowEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: EscrowEvent) {
        info!(
            campaign_id = event.campaign_id(),
            event = event.name(),
            "{:?}",
            event
        );
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    pub fn all(&self) -> Vec<EscrowEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn for_campaign(&self, campaign_id: u64) -> Vec<EscrowEvent> {
        self.all()
            .into_iter()
            .filter(|event| event.campaign_id() == campaign_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
