//! # Concurrency Flows
//!
//! A single forest shared through `Arc` across tasks and threads. Checks
//! that concurrent ingests either land or fail with `ChainLinkage`, that
//! cross-shard moves never deadlock, and that block totals are conserved.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use mf_02_merkle_forest::domain::{
        invariant_chain_linkage, invariant_conservation, invariant_root_matches,
    };
    use mf_02_merkle_forest::{
        ForestConfig, ForestError, MerkleForest, MerkleForestApi, ProofOfWorkFactory,
        StaticConsensusGate,
    };

    fn shared_forest(shards: u16, capacity: usize, sync: bool) -> Arc<MerkleForest> {
        mf_telemetry::init_test_tracing();
        let config = ForestConfig::default()
            .with_shard_count(shards)
            .with_max_shard_capacity(capacity)
            .with_sync_on_ingest(sync);
        Arc::new(MerkleForest::new(config).expect("valid config"))
    }

    fn assert_consistent(forest: &MerkleForest) {
        for id in 0..forest.shard_count() {
            let shard = forest.read_shard(id).unwrap();
            invariant_chain_linkage(shard.blocks()).unwrap();
            invariant_root_matches(shard.blocks(), shard.merkle_root()).unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ingest_conserves_blocks() {
        let forest = shared_forest(4, 100, false);
        let factory = Arc::new(ProofOfWorkFactory::new(2, 1));
        let mut rng = StdRng::seed_from_u64(7);

        let mut handles = Vec::new();
        for i in 0..32u32 {
            let forest = Arc::clone(&forest);
            let factory = Arc::clone(&factory);
            let len = rng.gen_range(1..64);
            let payload: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

            handles.push(tokio::spawn(async move {
                let gate = StaticConsensusGate::accepting();
                let validator = format!("validator-{}", i % 3);
                forest
                    .ingest(payload, &validator, factory.as_ref(), &gate)
                    .await
            }));
        }

        let mut accepted = 0;
        let mut raced = 0;
        for handle in handles {
            match handle.await.expect("task panicked") {
                Ok(_) => accepted += 1,
                Err(ForestError::ChainLinkage { .. }) => raced += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(accepted + raced, 32);
        assert!(accepted > 0);
        invariant_conservation(4, forest.total_blocks(), accepted).unwrap();
        assert_consistent(&forest);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ingest_with_sync_keeps_chains_valid() {
        let forest = shared_forest(3, 6, true);
        let factory = Arc::new(ProofOfWorkFactory::new(0, 1));

        let handles: Vec<_> = (0..24u8)
            .map(|i| {
                let forest = Arc::clone(&forest);
                let factory = Arc::clone(&factory);
                tokio::spawn(async move {
                    forest
                        .ingest(vec![i; 16], "v1", factory.as_ref(), &StaticConsensusGate::accepting())
                        .await
                })
            })
            .collect();

        for handle in handles {
            match handle.await.expect("task panicked") {
                Ok(_) | Err(ForestError::ChainLinkage { .. }) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        forest.global_recompute_roots().unwrap();
        assert_consistent(&forest);
        let root = forest.forest_root().unwrap();
        assert_eq!(root.total_blocks(), forest.total_blocks());
    }

    #[test]
    fn test_opposing_transfers_do_not_deadlock() {
        let forest = shared_forest(4, 1_000, false);
        let before = forest.total_blocks();

        std::thread::scope(|scope| {
            for worker in 0..8u16 {
                let forest = Arc::clone(&forest);
                scope.spawn(move || {
                    let shards = forest.shard_count();
                    for round in 0..200u16 {
                        let a = (worker + round) % shards;
                        let b = (a + 1 + worker % (shards - 1)) % shards;
                        let (from, to) = if round % 2 == 0 { (a, b) } else { (b, a) };

                        match forest.transfer_tail(from, to) {
                            Ok(_) | Err(ForestError::EmptyShard(_)) => {}
                            Err(other) => panic!("unexpected error: {}", other),
                        }
                        if round % 7 == 0 {
                            let _ = forest.maybe_rebalance().unwrap();
                            let _ = forest.synchronize_neighbor_shard(a).unwrap();
                        }
                    }
                });
            }
        });

        // Synchronization appends copies; transfers and rebalances only move.
        assert!(forest.total_blocks() >= before);
        assert_consistent(&forest);
    }

    #[test]
    fn test_transfers_alone_conserve_blocks() {
        let forest = shared_forest(3, 1_000, false);
        let before = forest.total_blocks();

        std::thread::scope(|scope| {
            for worker in 0..6u16 {
                let forest = Arc::clone(&forest);
                scope.spawn(move || {
                    for round in 0..100u16 {
                        let from = (worker + round) % 3;
                        let to = (from + 1 + round % 2) % 3;
                        match forest.transfer_tail(from, to) {
                            Ok(_) | Err(ForestError::EmptyShard(_)) => {}
                            Err(other) => panic!("unexpected error: {}", other),
                        }
                    }
                });
            }
        });

        invariant_conservation(before, forest.total_blocks(), 0).unwrap();
        assert_consistent(&forest);
    }
}
