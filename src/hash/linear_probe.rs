//! 线性探测策略 - 单个哈希决定探测起点，之后步长 1

use crate::hash::{
    calculate_bucket, classic,
    strategy::{seeded_hash, HashAlgorithm},
};

const SEED: u64 = 42;

/// 线性探测策略
#[derive(Debug, Clone)]
pub struct LinearProbeStrategy {
    algorithm: HashAlgorithm,
}

impl LinearProbeStrategy {
    /// 创建新线性探测策略
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// 探测起点
    pub fn start(&self, key: &[u8], capacity: usize) -> usize {
        let hash = match self.algorithm {
            HashAlgorithm::Classic => u64::from(classic::probe(key)),
            algorithm => seeded_hash(algorithm, SEED, key),
        };
        calculate_bucket(hash, capacity)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl Default for LinearProbeStrategy {
    fn default() -> Self {
        Self::new(HashAlgorithm::Classic)
    }
}
