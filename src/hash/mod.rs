//! 哈希模块 - 统一管理哈希相关功能

pub mod classic;
pub mod double_hash;
pub mod linear_probe;
pub mod strategy;

pub use double_hash::DoubleHashStrategy;
pub use linear_probe::LinearProbeStrategy;
pub use strategy::{HashAlgorithm, HashStrategy};

/// 哈希工具函数
pub fn calculate_bucket(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// 计算被踢出条目的去向：两个候选槽位中不是当前槽位的那个
pub fn alternate_bucket(buckets: (usize, usize), current: usize) -> usize {
    if buckets.0 == current {
        buckets.1
    } else {
        buckets.0
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_calculation() {
        assert_eq!(calculate_bucket(123, 100), 23);
        assert_eq!(alternate_bucket((7, 4), 4), 7);
        assert_eq!(alternate_bucket((7, 4), 7), 4);
    }
}
