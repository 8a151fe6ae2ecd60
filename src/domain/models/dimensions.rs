//! Slowly-changing reference entities and the chain metadata they are synced from

use std::collections::BTreeMap;

/// A staked provider, keyed by its `lava@` address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub address: String,
    pub moniker: String,
}

impl Provider {
    pub fn new(address: &str, moniker: &str) -> Self {
        Self {
            address: address.to_string(),
            moniker: moniker.to_string(),
        }
    }
}

/// A chain supported by the network (spec id such as `ETH1`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Spec {
    pub id: String,
}

/// A subscription plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: String,
    pub description: String,
    /// Price in ulava
    pub price: i64,
}

impl Plan {
    /// A plan only known by id, before metadata sync fills it in
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            price: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Consumer {
    pub address: String,
}

/// Moniker merge rule: an empty incoming moniker never replaces an existing one
pub fn merge_moniker(existing: &str, incoming: &str) -> String {
    if incoming.is_empty() {
        existing.to_string()
    } else {
        incoming.to_string()
    }
}

/// A set of dimension rows, used for metadata sync and cache warm-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub providers: Vec<Provider>,
    pub specs: Vec<Spec>,
    pub plans: Vec<Plan>,
    pub consumers: Vec<Consumer>,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
            && self.specs.is_empty()
            && self.plans.is_empty()
            && self.consumers.is_empty()
    }
}

/// A provider's stake entry on one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStake {
    pub provider: String,
    pub moniker: String,
    pub spec: String,
    /// Stake in ulava, when the node reported one in that denom
    pub stake: Option<i64>,
}

/// Snapshot of the chain's current specs, stakes and plans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainMetadata {
    pub specs: Vec<String>,
    pub provider_stakes: Vec<ProviderStake>,
    pub plans: Vec<Plan>,
}

impl ChainMetadata {
    /// One stake row per provider and chain, sorted by key.
    ///
    /// Entries without a chain id cannot be keyed and are left out.
    pub fn current_stakes(&self) -> Vec<ProviderStake> {
        let mut stakes: BTreeMap<(String, String), ProviderStake> = BTreeMap::new();
        for stake in &self.provider_stakes {
            if stake.spec.is_empty() {
                continue;
            }
            stakes.insert((stake.provider.clone(), stake.spec.clone()), stake.clone());
        }
        stakes.into_values().collect()
    }

    /// Collapses the snapshot into one row per dimension key.
    ///
    /// A provider staked on several chains appears once; its moniker follows the
    /// same merge rule as block events.
    pub fn into_dimensions(self) -> Dimensions {
        let mut specs: BTreeMap<String, Spec> = BTreeMap::new();
        let mut providers: BTreeMap<String, Provider> = BTreeMap::new();
        let mut plans: BTreeMap<String, Plan> = BTreeMap::new();

        for id in self.specs {
            specs.insert(id.clone(), Spec { id });
        }

        for stake in self.provider_stakes {
            if !stake.spec.is_empty() {
                specs
                    .entry(stake.spec.clone())
                    .or_insert_with(|| Spec { id: stake.spec.clone() });
            }

            let entry = providers
                .entry(stake.provider.clone())
                .or_insert_with(|| Provider::new(&stake.provider, ""));
            entry.moniker = merge_moniker(&entry.moniker, &stake.moniker);
        }

        for plan in self.plans {
            plans.insert(plan.id.clone(), plan);
        }

        Dimensions {
            providers: providers.into_values().collect(),
            specs: specs.into_values().collect(),
            plans: plans.into_values().collect(),
            consumers: Vec::new(),
        }
    }
}
