//! 统计模块 - 表的计数器和快照

/// 操作计数器，由可变操作直接累加
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationCounters {
    pub insert_count: u64,
    pub update_count: u64,
    pub remove_count: u64,
    /// 踢出链中被搬移的条目总数
    pub kick_count: u64,
    /// 容量翻倍次数
    pub resize_count: u64,
    /// 全表重建次数（含翻倍、换哈希和清理墓碑）
    pub rehash_count: u64,
    /// 更换哈希函数的次数（含失败的尝试）
    pub reseed_count: u64,
}

/// 表统计信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TableStats {
    pub count: usize,
    pub capacity: usize,
    pub load_factor: f32,
    pub tombstones: usize,
    pub insert_count: u64,
    pub update_count: u64,
    pub remove_count: u64,
    pub kick_count: u64,
    pub resize_count: u64,
    pub rehash_count: u64,
    pub reseed_count: u64,
}

impl TableStats {
    /// 由当前规模和计数器生成快照
    pub fn snapshot(
        count: usize,
        capacity: usize,
        tombstones: usize,
        counters: &OperationCounters,
    ) -> Self {
        Self {
            count,
            capacity,
            load_factor: load_factor(count, capacity),
            tombstones,
            insert_count: counters.insert_count,
            update_count: counters.update_count,
            remove_count: counters.remove_count,
            kick_count: counters.kick_count,
            resize_count: counters.resize_count,
            rehash_count: counters.rehash_count,
            reseed_count: counters.reseed_count,
        }
    }
}

/// 负载因子 `count / capacity`
pub fn load_factor(count: usize, capacity: usize) -> f32 {
    if capacity == 0 {
        0.0
    } else {
        count as f32 / capacity as f32
    }
}
