//! 哈希表核心模块 - 布谷鸟表、线性探测表及其公共接口

pub mod config;
pub mod cuckoo_table;
pub mod probe_table;

pub use config::TableConfig;
pub use cuckoo_table::CuckooTable;
pub use probe_table::ProbeTable;

use crate::{
    error::AssocError,
    stats::{self, TableStats},
    types::{KeyKind, TableKind},
};

/// 关联表公共接口，调用方无需区分冲突解决策略
pub trait AssocTable<V> {
    /// 插入键值对，必要时先扩容；键已存在时更新其值
    fn insert(&mut self, key: &[u8], value: V) -> Result<(), AssocError>;

    /// 查找键对应的值
    fn lookup(&self, key: &[u8]) -> Option<&V>;

    /// 存活条目数
    fn count(&self) -> usize;

    /// 槽位数量
    fn capacity(&self) -> usize;

    fn key_kind(&self) -> KeyKind;

    fn stats(&self) -> TableStats;

    fn load_factor(&self) -> f32 {
        stats::load_factor(self.count(), self.capacity())
    }

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn contains_key(&self, key: &[u8]) -> bool {
        self.lookup(key).is_some()
    }
}

/// 按表类型创建默认配置的关联表
///
/// `key_size == 0` 表示字符串键。
pub fn new_table<V: 'static>(
    kind: TableKind,
    key_size: usize,
) -> Result<Box<dyn AssocTable<V>>, AssocError> {
    log_debug!("creating {:?} table, key_size={}", kind, key_size);
    Ok(match kind {
        TableKind::Cuckoo => Box::new(CuckooTable::<V>::new(key_size)?),
        TableKind::LinearProbe => Box::new(ProbeTable::<V>::new(key_size)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_selects_variant() {
        let mut cuckoo = new_table::<u32>(TableKind::Cuckoo, 0).unwrap();
        let mut probe = new_table::<u32>(TableKind::LinearProbe, 0).unwrap();

        for table in [&mut cuckoo, &mut probe] {
            table.insert(b"elf", 1).unwrap();
            assert!(table.contains_key(b"elf"));
            assert!(!table.is_empty());
            assert_eq!(table.load_factor(), 1.0 / 16.0);
            assert_eq!(table.key_kind(), KeyKind::String);
        }
        assert_eq!(cuckoo.stats().tombstones, 0);
    }
}
