//! Dimension dedup cache
//!
//! Two tiers keep dimension writes down to rows the store has not seen yet:
//! - `DimensionCache` is process-wide, warmed from the store at startup and
//!   refreshed by metadata sync. Block workers only read it.
//! - `BlockDimensions` is private to one block. It is merged into the shared
//!   tier after that block's transaction commits and dropped otherwise.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use crate::domain::models::{merge_moniker, Consumer, Dimensions, Plan, Provider, Spec};

/// Entry counts of the process-wide cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub providers: usize,
    pub specs: usize,
    pub plans: usize,
    pub consumers: usize,
}

/// Thread-safe process-wide dimension cache
#[derive(Debug, Default)]
pub struct DimensionCache {
    providers: RwLock<HashMap<String, Provider>>,
    specs: RwLock<HashSet<String>>,
    plans: RwLock<HashMap<String, Plan>>,
    consumers: RwLock<HashSet<String>>,
}

impl DimensionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(&self, address: &str) -> Option<Provider> {
        if let Ok(providers) = self.providers.read() {
            providers.get(address).cloned()
        } else {
            None
        }
    }

    pub fn has_spec(&self, id: &str) -> bool {
        self.specs.read().map(|s| s.contains(id)).unwrap_or(false)
    }

    pub fn plan(&self, id: &str) -> Option<Plan> {
        if let Ok(plans) = self.plans.read() {
            plans.get(id).cloned()
        } else {
            None
        }
    }

    pub fn has_consumer(&self, address: &str) -> bool {
        self.consumers
            .read()
            .map(|c| c.contains(address))
            .unwrap_or(false)
    }

    /// Applies the dimensions a committed block wrote
    pub fn merge(&self, block: &BlockDimensions) {
        if let Ok(mut providers) = self.providers.write() {
            for provider in block.providers.values() {
                upsert_provider(&mut providers, provider);
            }
        }
        if let Ok(mut specs) = self.specs.write() {
            specs.extend(block.specs.iter().cloned());
        }
        if let Ok(mut plans) = self.plans.write() {
            // Placeholder plans never replace synced ones
            for plan in block.plans.values() {
                plans.entry(plan.id.clone()).or_insert_with(|| plan.clone());
            }
        }
        if let Ok(mut consumers) = self.consumers.write() {
            consumers.extend(block.consumers.iter().cloned());
        }
    }

    /// Extends the cache from a store load or a metadata sync; plan details are replaced
    pub fn refresh(&self, snapshot: &Dimensions) {
        if let Ok(mut providers) = self.providers.write() {
            for provider in &snapshot.providers {
                upsert_provider(&mut providers, provider);
            }
        }
        if let Ok(mut specs) = self.specs.write() {
            specs.extend(snapshot.specs.iter().map(|s| s.id.clone()));
        }
        if let Ok(mut plans) = self.plans.write() {
            for plan in &snapshot.plans {
                plans.insert(plan.id.clone(), plan.clone());
            }
        }
        if let Ok(mut consumers) = self.consumers.write() {
            consumers.extend(snapshot.consumers.iter().map(|c| c.address.clone()));
        }
    }

    /// Get cache statistics for logging
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            providers: self.providers.read().map(|c| c.len()).unwrap_or(0),
            specs: self.specs.read().map(|c| c.len()).unwrap_or(0),
            plans: self.plans.read().map(|c| c.len()).unwrap_or(0),
            consumers: self.consumers.read().map(|c| c.len()).unwrap_or(0),
        }
    }
}

fn upsert_provider(providers: &mut HashMap<String, Provider>, incoming: &Provider) {
    providers
        .entry(incoming.address.clone())
        .and_modify(|existing| existing.moniker = merge_moniker(&existing.moniker, &incoming.moniker))
        .or_insert_with(|| incoming.clone());
}

/// Dimension rows first referenced by one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDimensions {
    providers: BTreeMap<String, Provider>,
    specs: BTreeSet<String>,
    plans: BTreeMap<String, Plan>,
    consumers: BTreeSet<String>,
}

impl BlockDimensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a provider, recording it locally only when the store needs a write.
    ///
    /// A provider already cached with the same merged moniker produces no entry.
    pub fn get_or_create_provider(
        &mut self,
        shared: &DimensionCache,
        address: &str,
        moniker: &str,
    ) -> Provider {
        if let Some(local) = self.providers.get_mut(address) {
            local.moniker = merge_moniker(&local.moniker, moniker);
            return local.clone();
        }

        if let Some(cached) = shared.provider(address) {
            let merged = merge_moniker(&cached.moniker, moniker);
            if merged == cached.moniker {
                return cached;
            }
            let refined = Provider::new(address, &merged);
            self.providers.insert(address.to_string(), refined.clone());
            return refined;
        }

        let created = Provider::new(address, moniker);
        self.providers.insert(address.to_string(), created.clone());
        created
    }

    pub fn get_or_create_spec(&mut self, shared: &DimensionCache, id: &str) -> Spec {
        if !self.specs.contains(id) && !shared.has_spec(id) {
            self.specs.insert(id.to_string());
        }
        Spec { id: id.to_string() }
    }

    pub fn get_or_create_plan(&mut self, shared: &DimensionCache, id: &str) -> Plan {
        if let Some(local) = self.plans.get(id) {
            return local.clone();
        }
        if let Some(cached) = shared.plan(id) {
            return cached;
        }
        let created = Plan::placeholder(id);
        self.plans.insert(id.to_string(), created.clone());
        created
    }

    pub fn get_or_create_consumer(&mut self, shared: &DimensionCache, address: &str) -> Consumer {
        if !self.consumers.contains(address) && !shared.has_consumer(address) {
            self.consumers.insert(address.to_string());
        }
        Consumer {
            address: address.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
            && self.specs.is_empty()
            && self.plans.is_empty()
            && self.consumers.is_empty()
    }

    /// Rows to insert, in key order
    pub fn to_dimensions(&self) -> Dimensions {
        Dimensions {
            providers: self.providers.values().cloned().collect(),
            specs: self.specs.iter().map(|id| Spec { id: id.clone() }).collect(),
            plans: self.plans.values().cloned().collect(),
            consumers: self
                .consumers
                .iter()
                .map(|address| Consumer {
                    address: address.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER: &str = "lava@1wcw0xtpvfrernwhp6qj4v2hph25v78vtjupdly";

    #[test]
    fn test_moniker_survives_empty_follow_up() {
        let shared = DimensionCache::new();
        let mut block = BlockDimensions::new();

        block.get_or_create_provider(&shared, PROVIDER, "X");
        let provider = block.get_or_create_provider(&shared, PROVIDER, "");
        assert_eq!(provider.moniker, "X");

        shared.merge(&block);
        let mut next = BlockDimensions::new();
        let provider = next.get_or_create_provider(&shared, PROVIDER, "");
        assert_eq!(provider.moniker, "X");
        assert!(next.is_empty());
    }

    #[test]
    fn test_empty_moniker_is_refined_later() {
        let shared = DimensionCache::new();
        let mut block = BlockDimensions::new();
        block.get_or_create_provider(&shared, PROVIDER, "");
        shared.merge(&block);

        let mut next = BlockDimensions::new();
        let provider = next.get_or_create_provider(&shared, PROVIDER, "X");
        assert_eq!(provider.moniker, "X");
        assert_eq!(next.to_dimensions().providers, vec![Provider::new(PROVIDER, "X")]);

        shared.merge(&next);
        assert_eq!(shared.provider(PROVIDER).unwrap().moniker, "X");
    }

    #[test]
    fn test_cached_entities_produce_no_writes() {
        let shared = DimensionCache::new();
        shared.refresh(&Dimensions {
            providers: vec![Provider::new(PROVIDER, "alpha")],
            specs: vec![Spec {
                id: "ETH1".to_string(),
            }],
            plans: vec![Plan {
                id: "explorer".to_string(),
                description: "explorer plan".to_string(),
                price: 100,
            }],
            consumers: vec![Consumer {
                address: PROVIDER.to_string(),
            }],
        });

        let mut block = BlockDimensions::new();
        block.get_or_create_provider(&shared, PROVIDER, "alpha");
        block.get_or_create_spec(&shared, "ETH1");
        let plan = block.get_or_create_plan(&shared, "explorer");
        block.get_or_create_consumer(&shared, PROVIDER);

        assert_eq!(plan.price, 100);
        assert!(block.is_empty());
    }

    #[test]
    fn test_unmerged_block_does_not_leak() {
        let shared = DimensionCache::new();
        let mut block = BlockDimensions::new();
        block.get_or_create_spec(&shared, "NEAR");
        block.get_or_create_consumer(&shared, PROVIDER);
        drop(block);

        assert_eq!(shared.stats(), CacheStats::default());
    }

    #[test]
    fn test_placeholder_plan_does_not_replace_synced_plan() {
        let shared = DimensionCache::new();
        let mut block = BlockDimensions::new();
        block.get_or_create_plan(&shared, "explorer");

        shared.refresh(&Dimensions {
            plans: vec![Plan {
                id: "explorer".to_string(),
                description: "synced".to_string(),
                price: 7,
            }],
            ..Dimensions::default()
        });
        shared.merge(&block);

        assert_eq!(shared.plan("explorer").unwrap().price, 7);
    }
}
