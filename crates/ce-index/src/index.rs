//! `CategoricalIndex` — one [`AgentBucket`] per compound category.

use std::fmt::Write as _;

use ce_core::{AgentId, AgentRng, CategoryKey, CompoundIndexer, Dimensions, Step};

use crate::{AgentBucket, AgentHandle, IndexError, IndexResult};

/// Flat array of agent buckets addressed by compound category id.
///
/// The index is rebuilt from scratch every step; there is no incremental
/// update.  Between [`clear`](Self::clear) and [`mark_built`](Self::mark_built)
/// the index accepts inserts but refuses queries, so a half-built index is
/// never sampled.
pub struct CategoricalIndex {
    indexer: CompoundIndexer,
    buckets: Vec<AgentBucket>,
    /// Step of the last completed rebuild; `None` until the first one.
    epoch:      Option<Step>,
    /// Completed rebuilds so far.  Handles are checked against this, so two
    /// rebuilds for the same step still invalidate each other's handles.
    generation: u64,
    /// Total agents across all buckets.
    len:        usize,
}

impl CategoricalIndex {
    /// Allocate `L·A·S` empty buckets.
    pub fn new(dims: Dimensions) -> Self {
        let indexer = CompoundIndexer::new(dims);
        Self {
            buckets: vec![AgentBucket::new(); indexer.bucket_count()],
            indexer,
            epoch:      None,
            generation: 0,
            len:        0,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.indexer.dimensions()
    }

    #[inline]
    pub fn indexer(&self) -> &CompoundIndexer {
        &self.indexer
    }

    /// Step of the last completed rebuild.
    #[inline]
    pub fn epoch(&self) -> Option<Step> {
        self.epoch
    }

    /// Total number of indexed agents across every bucket.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ── Rebuild ───────────────────────────────────────────────────────────

    /// Empty every bucket without releasing storage.  Idempotent.
    ///
    /// Invalidates the current epoch: queries fail with
    /// [`IndexError::NotBuilt`] until [`mark_built`](Self::mark_built).
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
        self.epoch = None;
    }

    /// File `agent` under `(location, age_bracket, risk_class)`.
    pub fn add_agent_to_index(
        &mut self,
        agent:       AgentId,
        location:    usize,
        age_bracket: usize,
        risk_class:  usize,
    ) -> IndexResult<()> {
        self.add_agent(agent, CategoryKey::new(location, age_bracket, risk_class))
    }

    /// Like [`add_agent_to_index`](Self::add_agent_to_index) with a prebuilt key.
    pub fn add_agent(&mut self, agent: AgentId, key: CategoryKey) -> IndexResult<()> {
        let id = self.indexer.compound_index(key)?;
        self.buckets[id].add(agent);
        self.len += 1;
        Ok(())
    }

    /// Declare the rebuild for `step` complete and open the index to queries.
    pub fn mark_built(&mut self, step: Step) {
        self.epoch = Some(step);
        self.generation += 1;
    }

    /// Number of completed rebuilds.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear, insert every `(agent, key)` pair, then mark the index built for
    /// `step`.
    ///
    /// On a bad key the index is left cleared and unbuilt.
    pub fn rebuild<I>(&mut self, step: Step, entries: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = (AgentId, CategoryKey)>,
    {
        self.clear();
        for (agent, key) in entries {
            if let Err(e) = self.add_agent(agent, key) {
                self.clear();
                return Err(e);
            }
        }
        self.mark_built(step);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    fn built_epoch(&self) -> IndexResult<Step> {
        self.epoch.ok_or(IndexError::NotBuilt)
    }

    /// The bucket for `key`.
    pub fn bucket(&self, key: CategoryKey) -> IndexResult<&AgentBucket> {
        self.built_epoch()?;
        let id = self.indexer.compound_index(key)?;
        Ok(&self.buckets[id])
    }

    /// Number of agents filed under `(location, age_bracket, risk_class)`.  O(1).
    pub fn num_agents_at_index(
        &self,
        location:    usize,
        age_bracket: usize,
        risk_class:  usize,
    ) -> IndexResult<usize> {
        self.bucket(CategoryKey::new(location, age_bracket, risk_class))
            .map(AgentBucket::len)
    }

    /// Uniformly random agent from `(location, age_bracket, risk_class)`.
    ///
    /// Returns `Ok(None)` when the category is empty.
    pub fn random_agent_from_index(
        &self,
        location:    usize,
        age_bracket: usize,
        risk_class:  usize,
        rng:         &mut AgentRng,
    ) -> IndexResult<Option<AgentHandle>> {
        let epoch = self.built_epoch()?;
        let bucket = self.bucket(CategoryKey::new(location, age_bracket, risk_class))?;
        Ok(bucket.random_agent(rng).map(|a| AgentHandle::new(a, epoch, self.generation)))
    }

    /// Check that `handle` was issued by the current rebuild.
    pub fn validate(&self, handle: AgentHandle) -> IndexResult<AgentId> {
        let current = self.built_epoch()?;
        if handle.is_from(self.generation) {
            Ok(handle.agent)
        } else {
            Err(IndexError::StaleHandle { handle, current })
        }
    }

    /// Per-location totals, summed over age brackets and risk classes.
    pub fn occupancy_by_location(&self) -> IndexResult<Vec<usize>> {
        self.built_epoch()?;
        let mut totals = vec![0usize; self.dimensions().locations()];
        for (key, bucket) in self.indexer.keys().zip(&self.buckets) {
            totals[key.location] += bucket.len();
        }
        Ok(totals)
    }

    /// `(key, occupancy)` for every category in compound-id order.
    pub fn occupancy(&self) -> impl Iterator<Item = (CategoryKey, usize)> + '_ {
        self.indexer.keys().zip(self.buckets.iter().map(AgentBucket::len))
    }

    /// Human-readable occupancy table, one line per non-empty category.
    pub fn describe_population(&self) -> String {
        let mut out = String::new();
        match self.epoch {
            Some(step) => {
                let _ = writeln!(out, "categorical index @ {step}: {} agents", self.len);
            }
            None => {
                let _ = writeln!(out, "categorical index (not built): {} agents", self.len);
            }
        }
        for (key, n) in self.occupancy().filter(|&(_, n)| n > 0) {
            let _ = writeln!(
                out,
                "  location {:>3}  age {:>2}  risk {:>2}  : {n}",
                key.location, key.age_bracket, key.risk_class
            );
        }
        out
    }
}
