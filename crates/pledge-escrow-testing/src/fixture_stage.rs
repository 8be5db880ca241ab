#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FixtureStage {
    /// Factory is deployed; no campaign exists yet
    #[default]
    FactoryDeployed,

    /// Campaign has been created by the creator and holds the bond (Draft)
    CampaignCreated,

    /// Creator approved the campaign; the bond sits in the yield pool
    CampaignApproved,

    /// pledger_1 pledged and voucher_1 vouched
    ContributionsPlaced,

    /// Clock sits exactly at the campaign's end date
    DeadlinePassed,
}

impl FixtureStage {
    pub fn all() -> &'static [FixtureStage] {
        &[
            FixtureStage::FactoryDeployed,
            FixtureStage::CampaignCreated,
            FixtureStage::CampaignApproved,
            FixtureStage::ContributionsPlaced,
            FixtureStage::DeadlinePassed,
        ]
    }

    /// Get the ordinal position of this stage in the progression
    pub fn ord(&self) -> u8 {
        match self {
            FixtureStage::FactoryDeployed => 0,
            FixtureStage::CampaignCreated => 1,
            FixtureStage::CampaignApproved => 2,
            FixtureStage::ContributionsPlaced => 3,
            FixtureStage::DeadlinePassed => 4,
        }
    }
}

impl PartialOrd for FixtureStage {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixtureStage {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ord().cmp(&other.ord())
    }
}
