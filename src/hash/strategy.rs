//! 哈希策略模块 - 定义槽位定位策略

use ahash::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// 经典乘法/减法累加哈希，不带种子
    #[default]
    Classic,
    AHash,
    XxHash,
}

/// 哈希策略特征
pub trait HashStrategy {
    /// 获取键在给定容量下的两个候选槽位
    fn locate_buckets(&self, key: &[u8], capacity: usize) -> (usize, usize);

    /// 当前使用的哈希算法
    fn algorithm(&self) -> HashAlgorithm;

    /// 换用一组新的哈希函数，之前的槽位分配全部失效
    fn reseed(&mut self);
}

/// 使用带种子的哈希算法计算字节哈希
///
/// `Classic` 没有种子，由调用方直接使用 [`crate::hash::classic`] 中的函数。
pub fn seeded_hash(algorithm: HashAlgorithm, seed: u64, data: &[u8]) -> u64 {
    match algorithm {
        HashAlgorithm::AHash => {
            let state = RandomState::with_seed(seed as usize);
            let mut hasher = state.build_hasher();
            data.hash(&mut hasher);
            hasher.finish()
        }
        HashAlgorithm::XxHash => {
            let mut hasher = twox_hash::XxHash64::with_seed(seed);
            data.hash(&mut hasher);
            hasher.finish()
        }
        HashAlgorithm::Classic => u64::from(crate::hash::classic::probe(data)),
    }
}
