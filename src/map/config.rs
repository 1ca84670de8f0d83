//! 表配置

use crate::{error::AssocError, hash::HashAlgorithm};

/// 初始槽位数量
pub const DEFAULT_CAPACITY: usize = 16;
/// 默认最大踢出深度
pub const DEFAULT_MAX_KICK_DEPTH: usize = 32;
/// 默认最大重新播种重建次数
pub const DEFAULT_MAX_REHASH_ATTEMPTS: usize = 8;

/// 哈希表配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// 初始槽位数量，必须是不小于 16 的 2 的幂
    pub initial_capacity: usize,
    /// 单次插入允许的最长踢出链（仅布谷鸟表）
    pub max_kick_depth: usize,
    /// 踢出失败后换哈希重建的最多次数（仅布谷鸟表）
    pub max_rehash_attempts: usize,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_kick_depth: DEFAULT_MAX_KICK_DEPTH,
            max_rehash_attempts: DEFAULT_MAX_REHASH_ATTEMPTS,
            hash_algorithm: HashAlgorithm::Classic,
        }
    }
}

impl TableConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), AssocError> {
        if self.initial_capacity < DEFAULT_CAPACITY || !self.initial_capacity.is_power_of_two() {
            return Err(AssocError::InvalidConfig {
                reason: format!(
                    "initial_capacity 必须是不小于 {} 的 2 的幂，实际为 {}",
                    DEFAULT_CAPACITY, self.initial_capacity
                ),
            });
        }
        if self.max_kick_depth == 0 {
            return Err(AssocError::InvalidConfig {
                reason: "max_kick_depth 不能为 0".into(),
            });
        }
        if self.max_rehash_attempts == 0 {
            return Err(AssocError::InvalidConfig {
                reason: "max_rehash_attempts 不能为 0".into(),
            });
        }
        Ok(())
    }
}
