//! # Merkle Forest Service
//!
//! Owns a fixed-size ordered collection of shards. Selects a target shard by
//! load score, drives the collaborator pipeline (mine, decide, append),
//! rebalances and replicates across neighbors.
//!
//! ## Locking
//!
//! Each shard sits behind its own `RwLock`. Single-shard operations take
//! only that lock. Two-shard operations lock the lower shard index first.
//! No lock is held while a collaborator future is awaited.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::algorithms::{compress_proof, compute_forest_root, plan_rebalance, select_target_shard};
use crate::domain::invariants::invariant_chain_linkage;
use crate::domain::{
    Block, BlockRef, ForestConfig, ForestError, ForestRoot, Hash, IngestReceipt, RebalanceMove,
    Shard, ShardId, ShardRecord, ShardRootEntry, SkipReason, SyncOutcome, TransferReceipt,
};
use crate::ports::inbound::MerkleForestApi;
use crate::ports::outbound::{BlockFactory, ConsensusGate};

/// The forest: `shard_count` independently locked shards.
#[derive(Debug)]
pub struct MerkleForest {
    config: ForestConfig,
    shards: Vec<RwLock<Shard>>,
}

/// Move the tail of `source` onto `dest`, re-chained.
///
/// On a failed append the block is put back on `source`.
fn move_tail(source: &mut Shard, dest: &mut Shard) -> Result<(Hash, BlockRef), ForestError> {
    let block = source.remove_tail()?;
    let relinked = block.relink(dest.tail());

    match dest.append(relinked) {
        Ok(block_ref) => {
            debug_assert!(invariant_chain_linkage(source.blocks()).is_ok());
            debug_assert!(invariant_chain_linkage(dest.blocks()).is_ok());
            Ok((block.hash, block_ref))
        }
        Err(err) => {
            source.append(block)?;
            Err(err)
        }
    }
}

impl MerkleForest {
    /// Create a forest; every shard starts with its genesis block.
    pub fn new(config: ForestConfig) -> Result<Self, ForestError> {
        config.validate()?;

        let mut shards = Vec::with_capacity(config.shard_count as usize);
        for id in 0..config.shard_count {
            let mut shard = Shard::with_filter(id, &config.filter)?;
            shard.append(Block::genesis(id))?;
            shards.push(RwLock::new(shard));
        }

        info!(
            "[mf-02] Forest initialized: {} shards, capacity {}",
            config.shard_count, config.max_shard_capacity
        );

        Ok(Self { config, shards })
    }

    fn shard(&self, id: ShardId) -> Result<&RwLock<Shard>, ForestError> {
        self.shards
            .get(id as usize)
            .ok_or(ForestError::UnknownShard(id))
    }

    /// Shared read access to one shard.
    pub fn read_shard(&self, id: ShardId) -> Result<RwLockReadGuard<'_, Shard>, ForestError> {
        Ok(self.shard(id)?.read())
    }

    /// Export a shard's durable record.
    pub fn shard_record(&self, id: ShardId) -> Result<ShardRecord, ForestError> {
        Ok(self.shard(id)?.read().to_record())
    }

    /// Total blocks across all shards.
    pub fn total_blocks(&self) -> usize {
        self.block_counts().iter().sum()
    }

    /// Write-lock two distinct shards, lower index first.
    ///
    /// Guards are returned in argument order.
    fn lock_pair(
        &self,
        a: ShardId,
        b: ShardId,
    ) -> Result<(RwLockWriteGuard<'_, Shard>, RwLockWriteGuard<'_, Shard>), ForestError> {
        if a == b {
            return Err(ForestError::SameShardTransfer(a));
        }
        let first = self.shard(a)?;
        let second = self.shard(b)?;

        if a < b {
            let guard_a = first.write();
            let guard_b = second.write();
            Ok((guard_a, guard_b))
        } else {
            let guard_b = second.write();
            let guard_a = first.write();
            Ok((guard_a, guard_b))
        }
    }

    /// Await a collaborator call under the configured deadline.
    async fn with_deadline<T, F>(&self, operation: &'static str, call: F) -> Result<T, ForestError>
    where
        F: Future<Output = T> + Send,
    {
        match self.config.collaborator_timeout_ms {
            Some(timeout_ms) => timeout(Duration::from_millis(timeout_ms), call)
                .await
                .map_err(|_| {
                    warn!("[mf-02] Upstream {} exceeded {}ms", operation, timeout_ms);
                    ForestError::UpstreamTimeout {
                        operation,
                        timeout_ms,
                    }
                }),
            None => Ok(call.await),
        }
    }

    /// Block to mine on for shard `id`.
    ///
    /// An empty shard yields an unattached genesis block and `true`; it is
    /// only appended once the candidate is accepted.
    fn chain_head(&self, id: ShardId) -> Result<(Block, bool), ForestError> {
        match self.shard(id)?.read().tail() {
            Some(tail) => Ok((tail.clone(), false)),
            None => Ok((Block::genesis(id), true)),
        }
    }

    /// Append an accepted candidate, first re-seeding genesis if needed.
    ///
    /// Either both blocks land or neither does.
    fn commit(
        &self,
        id: ShardId,
        genesis: Option<&Block>,
        candidate: Block,
    ) -> Result<BlockRef, ForestError> {
        let mut shard = self.shard(id)?.write();
        let seeded = match genesis {
            Some(genesis) if shard.is_empty() => {
                shard.append(genesis.clone())?;
                debug!("[mf-02] Re-seeded genesis on empty shard {}", id);
                true
            }
            _ => false,
        };

        match shard.append(candidate) {
            Ok(block_ref) => Ok(block_ref),
            Err(err) => {
                if seeded {
                    shard.remove_tail()?;
                }
                Err(err)
            }
        }
    }

    async fn ingest_inner(
        &self,
        request_id: Uuid,
        data: Vec<u8>,
        validator: &str,
        factory: &dyn BlockFactory,
        gate: &dyn ConsensusGate,
    ) -> Result<IngestReceipt, ForestError> {
        let target = MerkleForestApi::select_target_shard(self);
        let (prev, needs_genesis) = self.chain_head(target)?;

        let candidate = self
            .with_deadline("mine", factory.mine(&prev, &data, validator))
            .await??;
        if candidate.prev_hash != Some(prev.hash) {
            return Err(ForestError::ChainLinkage {
                shard: target,
                expected: Some(prev.hash),
                found: candidate.prev_hash,
            });
        }

        let accepted = self
            .with_deadline("decide", gate.decide(&candidate))
            .await?;
        if !accepted {
            warn!(
                "[mf-02] Block {:02x}{:02x}... rejected by consensus for shard {}",
                candidate.hash[0], candidate.hash[1], target
            );
            return Err(ForestError::ConsensusRejected {
                shard: target,
                block_hash: candidate.hash,
            });
        }

        let genesis = needs_genesis.then_some(&prev);
        let block = self.commit(target, genesis, candidate)?;
        info!(
            "[mf-02] Accepted {:02x}{:02x}... on shard {} at position {}",
            block.hash[0], block.hash[1], target, block.position
        );

        let rebalanced = MerkleForestApi::maybe_rebalance(self)?;
        let sync = if self.config.sync_on_ingest {
            MerkleForestApi::synchronize_neighbor_shard(self, target)?
        } else {
            SyncOutcome::Skipped {
                source: target,
                reason: SkipReason::Disabled,
            }
        };

        Ok(IngestReceipt {
            request_id,
            block,
            rebalanced,
            sync,
        })
    }
}

#[async_trait]
impl MerkleForestApi for MerkleForest {
    fn config(&self) -> &ForestConfig {
        &self.config
    }

    fn shard_count(&self) -> u16 {
        self.config.shard_count
    }

    fn block_counts(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.read().len()).collect()
    }

    fn select_target_shard(&self) -> ShardId {
        // Counts may be slightly stale under concurrent ingest; the cost is
        // load skew only.
        select_target_shard(
            &self.block_counts(),
            self.config.max_shard_capacity,
            self.config.overload_penalty,
        )
        .unwrap_or(0)
    }

    async fn ingest(
        &self,
        data: Vec<u8>,
        validator: &str,
        factory: &dyn BlockFactory,
        gate: &dyn ConsensusGate,
    ) -> Result<IngestReceipt, ForestError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("ingest", %request_id, validator);

        self.ingest_inner(request_id, data, validator, factory, gate)
            .instrument(span)
            .await
    }

    fn maybe_rebalance(&self) -> Result<Option<RebalanceMove>, ForestError> {
        let counts = self.block_counts();
        let Some(plan) = plan_rebalance(&counts, self.config.max_shard_capacity) else {
            return Ok(None);
        };

        let (mut source, mut dest) = self.lock_pair(plan.from, plan.to)?;
        // Re-check under the locks; a concurrent ingest may have closed the gap.
        if source.len() <= dest.len() + 1 {
            return Ok(None);
        }

        let (moved_hash, relinked) = move_tail(&mut source, &mut dest)?;
        info!(
            "[mf-02] Rebalanced {:02x}{:02x}... from shard {} ({} left) to shard {} ({} now)",
            moved_hash[0],
            moved_hash[1],
            plan.from,
            source.len(),
            plan.to,
            dest.len()
        );

        Ok(Some(RebalanceMove {
            from: plan.from,
            to: plan.to,
            moved_hash,
            relinked,
        }))
    }

    fn synchronize_neighbor_shard(&self, source: ShardId) -> Result<SyncOutcome, ForestError> {
        self.shard(source)?;
        let shard_count = self.config.shard_count;
        if shard_count == 1 {
            return Ok(SyncOutcome::Skipped {
                source,
                reason: SkipReason::SingleShard,
            });
        }
        let target = ((source as usize + 1) % shard_count as usize) as ShardId;

        let (src, mut dst) = self.lock_pair(source, target)?;
        let Some(tail) = src.tail() else {
            return Ok(SyncOutcome::Skipped {
                source,
                reason: SkipReason::EmptySource,
            });
        };

        let block_index = src.len() - 1;
        let proof = src.prove_inclusion(block_index)?;
        if !src.verify_inclusion(block_index, &proof)? {
            warn!(
                "[mf-02] Inclusion proof failed on shard {}, aborting sync to shard {}",
                source, target
            );
            return Ok(SyncOutcome::Aborted {
                source,
                target,
                block_index,
            });
        }

        let source_hash = tail.hash;
        let replica = tail.relink(dst.tail());
        let replica = dst.append(replica)?;
        info!(
            "[mf-02] Replicated {:02x}{:02x}... from shard {} to shard {} at position {}",
            source_hash[0], source_hash[1], source, target, replica.position
        );

        Ok(SyncOutcome::Replicated {
            source,
            target,
            source_hash,
            replica,
        })
    }

    fn transfer_tail(&self, from: ShardId, to: ShardId) -> Result<TransferReceipt, ForestError> {
        let (mut source, mut dest) = self.lock_pair(from, to)?;
        if source.is_empty() {
            return Err(ForestError::EmptyShard(from));
        }

        let index = source.len() - 1;
        let proof = source.prove_inclusion(index)?;
        if !source.verify_inclusion(index, &proof)? {
            warn!(
                "[mf-02] Inclusion proof failed on shard {}, refusing transfer to shard {}",
                from, to
            );
            return Err(ForestError::ProofVerificationFailed { shard: from, index });
        }

        let (source_hash, relinked) = move_tail(&mut source, &mut dest)?;
        info!(
            "[mf-02] Transferred {:02x}{:02x}... from shard {} to shard {}",
            source_hash[0], source_hash[1], from, to
        );

        Ok(TransferReceipt {
            from,
            to,
            source_hash,
            proof_len: proof.len(),
            proof_fingerprint: compress_proof(&proof),
            relinked,
        })
    }

    fn global_recompute_roots(&self) -> Result<(), ForestError> {
        for shard in &self.shards {
            shard.write().recompute_root()?;
        }
        debug!("[mf-02] Recomputed {} shard roots", self.shards.len());
        Ok(())
    }

    fn prove_inclusion(&self, shard: ShardId, block_index: usize) -> Result<Vec<Hash>, ForestError> {
        self.shard(shard)?.read().prove_inclusion(block_index)
    }

    fn verify_inclusion(
        &self,
        shard: ShardId,
        block_index: usize,
        proof: &[Hash],
    ) -> Result<bool, ForestError> {
        self.shard(shard)?.read().verify_inclusion(block_index, proof)
    }

    fn contains_hash(&self, shard: ShardId, hash: &Hash) -> Result<bool, ForestError> {
        Ok(self.shard(shard)?.read().contains_hash(hash))
    }

    fn accumulator_snapshot(&self, shard: ShardId) -> Result<[u8; 32], ForestError> {
        Ok(self.shard(shard)?.read().accumulator_snapshot())
    }

    fn merkle_root(&self, shard: ShardId) -> Result<Option<Hash>, ForestError> {
        Ok(self.shard(shard)?.read().merkle_root())
    }

    fn forest_root(&self) -> Result<ForestRoot, ForestError> {
        let entries: Vec<ShardRootEntry> = self
            .shards
            .iter()
            .map(|lock| {
                let shard = lock.read();
                ShardRootEntry {
                    shard_id: shard.id(),
                    root: shard.merkle_root(),
                    block_count: shard.len(),
                }
            })
            .collect();
        compute_forest_root(&entries)
    }
}
