//! 开放寻址关联表库
//!
//! 提供两种冲突解决策略的内存关联表，键可以是变长字符串或定长二进制串。
//!
//! ## 主要特性
//! - 布谷鸟哈希：每个键只有两个候选槽位，查找最多比较两次
//! - 线性探测：单哈希顺序扫描，支持墓碑删除
//! - 负载达到阈值前自动翻倍扩容
//! - 踢出链失败时换哈希函数在原容量下重建
//!
//! ## 快速开始
//!
//! ```rust
//! use assoc_table::{new_table, AssocTable, CuckooTable, TableKind};
//!
//! // 字符串键的布谷鸟表
//! let mut table = CuckooTable::new(0).expect("建表失败");
//! table.insert(b"snowman", "cold").expect("插入失败");
//! assert_eq!(table.lookup(b"snowman"), Some(&"cold"));
//!
//! // 通过接口选择策略，4 字节定长键
//! let mut probe = new_table::<u32>(TableKind::LinearProbe, 4).expect("建表失败");
//! probe.insert(&7u32.to_le_bytes(), 7).expect("插入失败");
//! println!("{:?}", probe.stats());
//! ```

#![warn(clippy::all)]

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

// 核心模块导出
pub mod error;
pub mod types;
pub mod hash;
pub mod memory;
pub mod map;
pub mod stats;

// 公共接口导出
pub use crate::{
    error::AssocError,
    hash::{DoubleHashStrategy, HashAlgorithm, HashStrategy, LinearProbeStrategy},
    map::{new_table, AssocTable, CuckooTable, ProbeTable, TableConfig},
    memory::KeyStore,
    stats::TableStats,
    types::{KeyKind, SlotState, TableKind},
};

// 便捷功能函数

/// 批量插入，遇到第一个错误即停止
///
/// 返回成功插入（含原地更新）的条目数。
pub fn batch_insert<K, V, I>(table: &mut dyn AssocTable<V>, items: I) -> Result<usize, AssocError>
where
    K: AsRef<[u8]>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut inserted = 0;
    for (key, value) in items {
        table.insert(key.as_ref(), value)?;
        inserted += 1;
    }
    Ok(inserted)
}

/// 批量查询
pub fn batch_get<'a, V, K>(
    table: &'a dyn AssocTable<V>,
    keys: impl IntoIterator<Item = K>,
) -> Vec<Option<&'a V>>
where
    K: AsRef<[u8]>,
{
    keys.into_iter().map(|key| table.lookup(key.as_ref())).collect()
}
