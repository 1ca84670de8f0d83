//! 双哈希策略 - 使用两个不同哈希函数定位布谷鸟候选槽位

use crate::hash::{
    calculate_bucket, classic,
    strategy::{seeded_hash, HashAlgorithm, HashStrategy},
};

/// 重新播种后首个种子
const INITIAL_SEED: u64 = 42;
/// 主备哈希之间的种子间隔
const SECONDARY_SEED_OFFSET: u64 = 81;
/// 每次重新播种的种子步长
const RESEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// 双哈希策略
#[derive(Debug, Clone)]
pub struct DoubleHashStrategy {
    algorithm: HashAlgorithm,
    seed: u64,
}

impl DoubleHashStrategy {
    /// 创建新双哈希策略
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            seed: INITIAL_SEED,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn primary_hash(&self, key: &[u8]) -> u64 {
        match self.algorithm {
            HashAlgorithm::Classic => u64::from(classic::cuckoo_primary(key)),
            algorithm => seeded_hash(algorithm, self.seed, key),
        }
    }

    fn secondary_hash(&self, key: &[u8]) -> u64 {
        match self.algorithm {
            HashAlgorithm::Classic => u64::from(classic::cuckoo_secondary(key)),
            algorithm => seeded_hash(algorithm, self.seed.wrapping_add(SECONDARY_SEED_OFFSET), key),
        }
    }
}

impl Default for DoubleHashStrategy {
    fn default() -> Self {
        Self::new(HashAlgorithm::Classic)
    }
}

impl HashStrategy for DoubleHashStrategy {
    fn locate_buckets(&self, key: &[u8], capacity: usize) -> (usize, usize) {
        let h1 = calculate_bucket(self.primary_hash(key), capacity);
        let h2 = calculate_bucket(self.secondary_hash(key), capacity);

        // 确保两个槽位不同
        if h1 == h2 {
            (h1, (h2 + 1) % capacity)
        } else {
            (h1, h2)
        }
    }

    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn reseed(&mut self) {
        match self.algorithm {
            // 经典哈希没有种子，换成带种子的 AHash
            HashAlgorithm::Classic => {
                self.algorithm = HashAlgorithm::AHash;
                self.seed = INITIAL_SEED;
            }
            _ => self.seed = self.seed.wrapping_add(RESEED_STEP),
        }
    }
}
