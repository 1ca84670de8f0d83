//! 线性探测哈希表 - 单哈希、步长 1 的探测序列，删除留下墓碑

use crate::{
    error::AssocError,
    hash::{HashAlgorithm, LinearProbeStrategy},
    map::{config::TableConfig, AssocTable},
    memory::{KeyStore, ValueSlots},
    stats::{OperationCounters, TableStats},
    types::{KeyKind, SlotState},
};
use std::fmt;

/// 插入前若 `count == capacity / RESIZE_DIVISOR` 则先扩容（50% 负载）
pub const RESIZE_DIVISOR: usize = 2;

/// 线性探测哈希表
///
/// 每次扫描最多访问 `capacity` 个槽位，即使墓碑占满了所有空槽位也会终止。
pub struct ProbeTable<V> {
    keys: KeyStore,
    values: ValueSlots<V>,
    capacity: usize,
    count: usize,
    tombstones: usize,
    hasher: LinearProbeStrategy,
    config: TableConfig,
    counters: OperationCounters,
}

impl<V> ProbeTable<V> {
    /// 创建新表：`key_size == 0` 为字符串键，否则为该长度的定长键
    pub fn new(key_size: usize) -> Result<Self, AssocError> {
        Self::with_config(KeyKind::from_key_size(key_size), TableConfig::default())
    }

    /// 使用指定配置创建
    pub fn with_config(key_kind: KeyKind, config: TableConfig) -> Result<Self, AssocError> {
        config.validate()?;

        let capacity = config.initial_capacity;
        Ok(Self {
            keys: KeyStore::with_capacity(key_kind, capacity)?,
            values: ValueSlots::with_capacity(capacity)?,
            capacity,
            count: 0,
            tombstones: 0,
            hasher: LinearProbeStrategy::new(config.hash_algorithm),
            config,
            counters: OperationCounters::default(),
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn key_kind(&self) -> KeyKind {
        self.keys.kind()
    }

    /// 当前墓碑数量
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// 从 `start` 开始环绕一周的探测序列
    #[inline]
    fn probe_sequence(start: usize, capacity: usize) -> impl Iterator<Item = usize> {
        (0..capacity).map(move |step| (start + step) % capacity)
    }

    /// 查找键所在槽位：遇到空槽位停止，跳过墓碑和不匹配的键
    fn find(&self, key: &[u8]) -> Option<usize> {
        let start = self.hasher.start(key, self.capacity);
        for slot in Self::probe_sequence(start, self.capacity) {
            match self.values.get(slot) {
                SlotState::Empty => return None,
                SlotState::Occupied(_) if self.keys.equals(slot, key) => return Some(slot),
                _ => {}
            }
        }
        None
    }

    /// 查找键对应的值
    pub fn lookup(&self, key: &[u8]) -> Option<&V> {
        if !self.keys.kind().admits(key) {
            return None;
        }
        self.find(key).and_then(|slot| self.values.value(slot))
    }

    /// 插入键值对；键已存在时原地更新值，计数不变
    ///
    /// 新条目放入探测序列中第一个墓碑槽位，没有墓碑时放入第一个空槽位。
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<(), AssocError> {
        self.keys.kind().validate(key)?;

        if self.count == self.capacity / RESIZE_DIVISOR {
            self.grow()?;
        } else if self.count + self.tombstones >= self.capacity / RESIZE_DIVISOR {
            log_info!(
                "probe table purging {} tombstones at capacity {}",
                self.tombstones,
                self.capacity
            );
            self.rebuild(self.capacity)?;
        }

        let start = self.hasher.start(key, self.capacity);
        let mut reusable = None;
        let mut target = None;
        for slot in Self::probe_sequence(start, self.capacity) {
            match self.values.get(slot) {
                SlotState::Empty => {
                    target = Some(reusable.unwrap_or(slot));
                    break;
                }
                SlotState::Tombstone => {
                    reusable.get_or_insert(slot);
                }
                SlotState::Occupied(_) => {
                    if self.keys.equals(slot, key) {
                        self.values.replace(slot, value);
                        self.counters.update_count += 1;
                        return Ok(());
                    }
                }
            }
        }

        // 负载上限保证至少有一个空槽位或墓碑
        let slot = target.or(reusable).ok_or(AssocError::TableFull {
            capacity: self.capacity,
        })?;
        if self.values.get(slot).is_tombstone() {
            self.tombstones -= 1;
        }
        self.keys.store(slot, key)?;
        self.values.occupy(slot, value);
        self.count += 1;
        self.counters.insert_count += 1;
        Ok(())
    }

    /// 删除键并返回其值，槽位标记为墓碑
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        if !self.keys.kind().admits(key) {
            return None;
        }
        let slot = self.find(key)?;
        let value = self.values.bury(slot)?;
        self.keys.clear(slot);
        self.count -= 1;
        self.tombstones += 1;
        self.counters.remove_count += 1;
        log_debug!("probe table removed slot {}, tombstones={}", slot, self.tombstones);
        Some(value)
    }

    fn grow(&mut self) -> Result<(), AssocError> {
        let new_capacity = self.capacity * 2;
        log_info!(
            "probe table resizing from {} to {} (count={})",
            self.capacity,
            new_capacity,
            self.count
        );
        self.rebuild(new_capacity)?;
        self.counters.resize_count += 1;
        Ok(())
    }

    /// 把存活条目重新探测放入新存储，丢弃全部墓碑；不改变 `count`
    ///
    /// 先规划每个条目的新槽位，全部找到后才搬移数据，失败时表保持原样。
    fn rebuild(&mut self, new_capacity: usize) -> Result<(), AssocError> {
        let mut new_keys = KeyStore::with_capacity(self.keys.kind(), new_capacity)?;
        let mut new_values = ValueSlots::with_capacity(new_capacity)?;

        let mut taken = Vec::new();
        taken
            .try_reserve_exact(new_capacity)
            .map_err(|e| AssocError::allocation(new_capacity, e))?;
        taken.resize(new_capacity, false);
        let mut moves = Vec::new();
        let move_size = self.count.saturating_mul(std::mem::size_of::<(usize, usize)>());
        moves
            .try_reserve_exact(self.count)
            .map_err(|e| AssocError::allocation(move_size, e))?;

        for old_slot in self.values.occupied() {
            let start = self.hasher.start(self.keys.read(old_slot), new_capacity);
            let new_slot = Self::probe_sequence(start, new_capacity)
                .find(|&slot| !taken[slot])
                .ok_or(AssocError::TableFull { capacity: new_capacity })?;
            taken[new_slot] = true;
            moves.push((old_slot, new_slot));
        }

        for (old_slot, new_slot) in moves {
            self.keys.move_to(old_slot, &mut new_keys, new_slot);
            if let SlotState::Occupied(value) = self.values.take(old_slot) {
                new_values.occupy(new_slot, value);
            }
        }

        self.keys = new_keys;
        self.values = new_values;
        self.capacity = new_capacity;
        self.tombstones = 0;
        self.counters.rehash_count += 1;
        Ok(())
    }

    /// 统计快照
    pub fn stats(&self) -> TableStats {
        TableStats::snapshot(self.count, self.capacity, self.tombstones, &self.counters)
    }
}

impl<V> AssocTable<V> for ProbeTable<V> {
    fn insert(&mut self, key: &[u8], value: V) -> Result<(), AssocError> {
        Self::insert(self, key, value)
    }

    fn lookup(&self, key: &[u8]) -> Option<&V> {
        Self::lookup(self, key)
    }

    fn count(&self) -> usize {
        Self::count(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn key_kind(&self) -> KeyKind {
        Self::key_kind(self)
    }

    fn stats(&self) -> TableStats {
        Self::stats(self)
    }
}

impl<V> fmt::Debug for ProbeTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("key_kind", &self.key_kind())
            .field("count", &self.count)
            .field("capacity", &self.capacity)
            .field("tombstones", &self.tombstones)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: u32) -> [u8; 4] {
        i.to_le_bytes()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = ProbeTable::new(0).unwrap();
        table.insert(b"abc", 1).unwrap();
        assert_eq!(table.find(b"abc"), Some(3));
        assert_eq!(table.lookup(b"abc"), Some(&1));
        assert_eq!(table.lookup(b"abd"), None);
    }

    #[test]
    fn test_collisions_probe_forward() {
        // "aa"、"aq"、"cm" 的起点都是槽位 3
        let mut table = ProbeTable::new(2).unwrap();
        for (i, k) in [b"aa", b"aq", b"cm"].into_iter().enumerate() {
            table.insert(k, i).unwrap();
        }
        assert_eq!(table.find(b"aa"), Some(3));
        assert_eq!(table.find(b"aq"), Some(4));
        assert_eq!(table.find(b"cm"), Some(5));
    }

    #[test]
    fn test_lookup_skips_tombstones() {
        let mut table = ProbeTable::new(2).unwrap();
        for (i, k) in [b"aa", b"aq", b"cm"].into_iter().enumerate() {
            table.insert(k, i).unwrap();
        }

        assert_eq!(table.remove(b"aq"), Some(1));
        assert_eq!(table.count(), 2);
        assert_eq!(table.tombstones(), 1);
        assert!(table.values.get(4).is_tombstone());
        assert_eq!(table.keys.read(4), &[0, 0], "墓碑槽位的键内存应被清零");

        // 墓碑不终止扫描
        assert_eq!(table.lookup(b"cm"), Some(&2));
        assert_eq!(table.lookup(b"aq"), None);
        assert_eq!(table.remove(b"aq"), None);

        // 新键复用第一个墓碑
        table.insert(b"df", 3).unwrap();
        assert_eq!(table.find(b"df"), Some(4));
        assert_eq!(table.tombstones(), 0);
    }

    #[test]
    fn test_update_skips_past_tombstone() {
        let mut table = ProbeTable::new(2).unwrap();
        for (i, k) in [b"aa", b"aq", b"cm"].into_iter().enumerate() {
            table.insert(k, i).unwrap();
        }
        table.remove(b"aq");

        // "cm" 在墓碑之后，应原地更新而不是在墓碑处再放一份
        table.insert(b"cm", 10).unwrap();
        assert_eq!(table.count(), 2);
        assert_eq!(table.find(b"cm"), Some(5));
        assert_eq!(table.lookup(b"cm"), Some(&10));
        assert_eq!(table.tombstones(), 1);
    }

    #[test]
    fn test_resize_at_half_load() {
        let mut table = ProbeTable::new(4).unwrap();
        for i in 0..8 {
            table.insert(&key(i), i).unwrap();
        }
        assert_eq!(table.capacity(), 16);

        table.insert(&key(8), 8).unwrap();
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.count(), 9);
        for i in 0..9 {
            assert_eq!(table.lookup(&key(i)), Some(&i));
        }
    }

    #[test]
    fn test_purge_tombstones_without_growing() {
        // 0..15 的起点互不相同
        let mut table = ProbeTable::new(4).unwrap();
        for i in 0..7 {
            table.insert(&key(i), i).unwrap();
        }
        table.remove(&key(0));
        table.remove(&key(1));
        table.insert(&key(8), 8).unwrap();
        assert_eq!(table.count() + table.tombstones(), 8);

        table.insert(&key(9), 9).unwrap();
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.count(), 7);
        assert_eq!(table.stats().rehash_count, 1);
        assert_eq!(table.stats().resize_count, 0);
        for i in [2, 3, 4, 5, 6, 8, 9] {
            assert_eq!(table.lookup(&key(i)), Some(&i));
        }
    }

    #[test]
    fn test_absent_lookup_terminates_when_no_empty_slot() {
        let mut table: ProbeTable<u32> = ProbeTable::new(0).unwrap();
        for slot in 0..table.capacity() {
            table.values.occupy(slot, 0);
            table.values.bury(slot);
        }
        assert_eq!(table.lookup(b"missing"), None);
        assert_eq!(table.remove(b"missing"), None);
    }

    #[test]
    fn test_wraps_around() {
        // 键 16 的起点是槽位 15，键 32 在容量 16 下也落在 15
        let mut table = ProbeTable::new(4).unwrap();
        let (a, b) = (key(16), key(32));
        assert_eq!(table.hasher.start(&a, 16), 15);
        assert_eq!(table.hasher.start(&b, 16), 15);

        table.insert(&a, "a").unwrap();
        table.insert(&b, "b").unwrap();
        assert_eq!(table.find(&b), Some(0));
        assert_eq!(table.lookup(&b), Some(&"b"));
    }

    #[test]
    fn test_insert_reports_full_table() {
        // 绕过计数把所有槽位占满，负载检查不会触发
        let mut table: ProbeTable<u32> = ProbeTable::new(0).unwrap();
        for slot in 0..table.capacity() {
            table.keys.store(slot, format!("filler-{}", slot).as_bytes()).unwrap();
            table.values.occupy(slot, 0);
        }
        assert_eq!(table.insert(b"abc", 1), Err(AssocError::TableFull { capacity: 16 }));
        assert_eq!(table.count(), 0);
        assert_eq!(table.keys.owned_strings(), 16);
    }

    #[test]
    fn test_rebuild_without_room_keeps_entries() {
        let mut table = ProbeTable::new(2).unwrap();
        for (i, k) in [b"aa", b"aq", b"cm"].into_iter().enumerate() {
            table.insert(k, i).unwrap();
        }

        assert_eq!(table.rebuild(2), Err(AssocError::TableFull { capacity: 2 }));
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.count(), 3);
        assert_eq!(table.find(b"aq"), Some(4));
        assert_eq!(table.lookup(b"cm"), Some(&2));
        assert_eq!(table.stats().rehash_count, 0);
    }

    #[test]
    fn test_key_errors() {
        let mut table = ProbeTable::new(4).unwrap();
        assert!(matches!(table.insert(b"ab", 1), Err(AssocError::KeySizeMismatch { .. })));
        assert_eq!(table.lookup(b"ab"), None);
        assert_eq!(table.remove(b"ab"), None);

        let mut table = ProbeTable::new(0).unwrap();
        assert!(matches!(table.insert(b"\0", 1), Err(AssocError::InvalidKey { .. })));
    }

    #[test]
    fn test_remove_releases_string() {
        let mut table = ProbeTable::new(0).unwrap();
        table.insert(b"ornament", 1).unwrap();
        table.insert(b"carol", 2).unwrap();
        assert_eq!(table.keys.owned_strings(), 2);

        table.remove(b"ornament");
        assert_eq!(table.keys.owned_strings(), 1);
        assert_eq!(table.stats().remove_count, 1);
    }
}
