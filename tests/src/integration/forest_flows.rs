//! # Forest Integration Flows
//!
//! Drives `MerkleForest` through its public API with the bundled
//! collaborator adapters and both presence filter variants.
//!
//! ## Flows Tested:
//!
//! 1. **Ingest pipeline**: mine, consensus decision, append, neighbor sync
//! 2. **Collaborator deadlines**: slow factory or gate surfaces as a timeout
//! 3. **Load management**: rebalance fires inside ingest, transfers carry proofs
//! 4. **Durability**: shard records replay to identical roots

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use mf_01_presence_filter::PresenceFilterConfig;
    use mf_02_merkle_forest::algorithms::{compute_forest_root, fingerprint_matches};
    use mf_02_merkle_forest::domain::{
        invariant_balanced, invariant_chain_linkage, invariant_conservation,
        invariant_root_matches,
    };
    use mf_02_merkle_forest::{
        build_root, Block, BlockFactory, ConsensusGate, ForestConfig, ForestError, MerkleForest,
        MerkleForestApi, ProofOfWorkFactory, ScriptedConsensusGate, Shard, StaticConsensusGate,
        SyncOutcome,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn forest_with(config: ForestConfig) -> MerkleForest {
        mf_telemetry::init_test_tracing();
        MerkleForest::new(config).expect("valid config")
    }

    fn assert_consistent(forest: &MerkleForest) {
        for id in 0..forest.shard_count() {
            let shard = forest.read_shard(id).unwrap();
            invariant_chain_linkage(shard.blocks()).unwrap();
            invariant_root_matches(shard.blocks(), shard.merkle_root()).unwrap();
        }
    }

    /// Factory that stalls before delegating to a zero-difficulty miner.
    struct StallingFactory {
        delay: Duration,
    }

    #[async_trait]
    impl BlockFactory for StallingFactory {
        async fn mine(&self, prev: &Block, data: &[u8], validator: &str) -> Result<Block, ForestError> {
            tokio::time::sleep(self.delay).await;
            ProofOfWorkFactory::new(0, 1).mine(prev, data, validator).await
        }
    }

    struct StallingGate;

    #[async_trait]
    impl ConsensusGate for StallingGate {
        async fn decide(&self, _candidate: &Block) -> bool {
            tokio::time::sleep(Duration::from_secs(60)).await;
            true
        }
    }

    // =============================================================================
    // INGEST PIPELINE
    // =============================================================================

    #[tokio::test]
    async fn test_ingest_with_scripted_consensus_and_bloom_filter() {
        let config = ForestConfig::default()
            .with_filter(PresenceFilterConfig::counting_bloom(256, 0.01));
        let forest = forest_with(config);
        let factory = ProofOfWorkFactory::new(4, 1_000);
        let gate = ScriptedConsensusGate::new([true, false, true], true);

        let first = forest.ingest(b"alpha".to_vec(), "v1", &factory, &gate).await.unwrap();
        let rejected = forest.ingest(b"beta".to_vec(), "v1", &factory, &gate).await;
        let third = forest.ingest(b"gamma".to_vec(), "v2", &factory, &gate).await.unwrap();

        assert!(matches!(
            rejected,
            Err(ForestError::ConsensusRejected { shard: 0, .. })
        ));
        assert_eq!(gate.history(), vec![true, false, true]);
        assert_ne!(first.request_id, third.request_id);

        assert!(factory.meets_difficulty(&first.block.hash));
        assert!(factory.meets_difficulty(&third.block.hash));
        assert!(first.sync.is_replicated());
        assert!(third.sync.is_replicated());

        // Two accepted ingests, each replicated once.
        assert_eq!(forest.block_counts(), vec![3, 3]);
        assert!(forest.contains_hash(0, &third.block.hash).unwrap());
        assert_consistent(&forest);
    }

    #[tokio::test]
    async fn test_replica_lands_on_neighbor_chain() {
        let forest = forest_with(ForestConfig::for_testing());
        let factory = ProofOfWorkFactory::new(0, 1);
        let gate = StaticConsensusGate::accepting();

        let receipt = forest.ingest(b"payload".to_vec(), "v1", &factory, &gate).await.unwrap();

        let SyncOutcome::Replicated { target, replica, source_hash, .. } = receipt.sync else {
            panic!("expected replication, got {:?}", receipt.sync);
        };
        assert_eq!(target, 1);
        assert_eq!(source_hash, receipt.block.hash);

        let neighbor = forest.read_shard(target).unwrap();
        let copied = &neighbor.blocks()[replica.position];
        assert_eq!(copied.data, b"payload".to_vec());
        assert_eq!(copied.validator, "v1");
        assert_ne!(copied.hash, source_hash);
        drop(neighbor);

        assert_eq!(forest.block_counts(), vec![2, 2, 1, 1]);
    }

    // =============================================================================
    // COLLABORATOR DEADLINES
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_slow_gate_times_out_without_mutation() {
        let forest = forest_with(ForestConfig::default().with_collaborator_timeout_ms(250));
        let before = forest.forest_root().unwrap();

        let result = forest
            .ingest(b"late".to_vec(), "v1", &ProofOfWorkFactory::new(0, 1), &StallingGate)
            .await;

        let err = result.unwrap_err();
        assert_eq!(
            err,
            ForestError::UpstreamTimeout {
                operation: "decide",
                timeout_ms: 250
            }
        );
        assert!(err.is_retryable());
        assert_eq!(forest.forest_root().unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_factory_times_out() {
        let forest = forest_with(ForestConfig::default().with_collaborator_timeout_ms(250));
        let factory = StallingFactory {
            delay: Duration::from_secs(5),
        };

        let result = forest
            .ingest(b"late".to_vec(), "v1", &factory, &StaticConsensusGate::accepting())
            .await;

        assert!(matches!(
            result,
            Err(ForestError::UpstreamTimeout {
                operation: "mine",
                ..
            })
        ));
        assert_eq!(forest.block_counts(), vec![1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_deadline_waits_for_slow_factory() {
        let forest = forest_with(ForestConfig::default());
        let factory = StallingFactory {
            delay: Duration::from_secs(5),
        };

        let receipt = forest
            .ingest(b"patient".to_vec(), "v1", &factory, &StaticConsensusGate::accepting())
            .await
            .unwrap();

        assert_eq!(receipt.block.shard_id, 0);
    }

    // =============================================================================
    // LOAD MANAGEMENT
    // =============================================================================

    #[tokio::test]
    async fn test_rebalance_restores_balance() {
        let config = ForestConfig::default()
            .with_max_shard_capacity(2)
            .with_sync_on_ingest(false);
        let forest = forest_with(config);
        let factory = ProofOfWorkFactory::new(0, 1);
        let gate = StaticConsensusGate::accepting();

        for i in 0..4u8 {
            let receipt = forest.ingest(vec![i], "v1", &factory, &gate).await.unwrap();
            assert!(receipt.rebalanced.is_none());
        }
        forest.transfer_tail(1, 0).unwrap();
        forest.transfer_tail(1, 0).unwrap();
        assert_eq!(forest.block_counts(), vec![5, 1]);

        let receipt = forest.ingest(vec![4], "v1", &factory, &gate).await.unwrap();

        let moved = receipt.rebalanced.expect("overloaded shard should shed its tail");
        assert_eq!((moved.from, moved.to), (0, 1));
        assert_eq!(forest.block_counts(), vec![4, 3]);
        assert_eq!(forest.maybe_rebalance().unwrap(), None);

        invariant_conservation(2, forest.total_blocks(), 5).unwrap();
        invariant_balanced(&forest.block_counts(), 1).unwrap();
        assert_consistent(&forest);
    }

    #[tokio::test]
    async fn test_transfer_receipt_fingerprints_proof() {
        let config = ForestConfig::default()
            .with_max_shard_capacity(10)
            .with_sync_on_ingest(false);
        let forest = forest_with(config);
        let factory = ProofOfWorkFactory::new(0, 1);
        let gate = StaticConsensusGate::accepting();

        for i in 0..6u8 {
            forest.ingest(vec![i], "v1", &factory, &gate).await.unwrap();
        }
        assert_eq!(forest.block_counts(), vec![4, 4]);
        let proof = forest.prove_inclusion(0, 3).unwrap();

        let receipt = forest.transfer_tail(0, 1).unwrap();

        assert_eq!(receipt.proof_len, proof.len());
        assert!(fingerprint_matches(&proof, &receipt.proof_fingerprint));
        assert_eq!(forest.block_counts(), vec![3, 5]);
        assert!(!forest.contains_hash(0, &receipt.source_hash).unwrap());
        assert!(forest.contains_hash(1, &receipt.relinked.hash).unwrap());
        assert_consistent(&forest);
    }

    #[test]
    fn test_transfer_refuses_same_shard_and_unknown_shard() {
        let forest = forest_with(ForestConfig::default());

        assert_eq!(
            forest.transfer_tail(0, 0),
            Err(ForestError::SameShardTransfer(0))
        );
        assert_eq!(forest.transfer_tail(0, 5), Err(ForestError::UnknownShard(5)));
        assert_eq!(forest.block_counts(), vec![1, 1]);
    }

    // =============================================================================
    // ROOTS AND DURABILITY
    // =============================================================================

    #[tokio::test]
    async fn test_roots_and_records_after_activity() {
        let forest = forest_with(ForestConfig::for_testing());
        let factory = ProofOfWorkFactory::new(0, 1);
        let gate = StaticConsensusGate::accepting();

        for i in 0..6u8 {
            forest.ingest(vec![i; 8], "v1", &factory, &gate).await.unwrap();
        }
        forest.global_recompute_roots().unwrap();

        let root = forest.forest_root().unwrap();
        assert_eq!(compute_forest_root(&root.shards).unwrap(), root);
        assert_eq!(root.total_blocks(), forest.total_blocks());

        for id in 0..forest.shard_count() {
            let hashes = forest.read_shard(id).unwrap().block_hashes();
            assert_eq!(forest.merkle_root(id).unwrap(), Some(build_root(&hashes).unwrap()));

            let record = forest.shard_record(id).unwrap();
            let restored =
                Shard::from_record(record.clone(), forest.config().filter.build().unwrap())
                    .unwrap();
            assert_eq!(restored.to_record(), record);
            for hash in &hashes {
                assert!(restored.contains_hash(hash));
            }
        }
    }
}
