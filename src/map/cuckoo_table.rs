//! 布谷鸟哈希表 - 两个候选槽位，踢出式重定位
//!
//! 每个键只可能位于主哈希槽位或备哈希槽位。两个都被占用时，把备槽位的
//! 占用者踢到它自己的另一个槽位，必要时沿链逐级踢出。踢出链先在不修改表的
//! 情况下算出，超过最大深度或出现回环即判定失败，此时换一组哈希函数在原容量
//! 下重建全表后重试。

use crate::{
    error::AssocError,
    hash::{alternate_bucket, DoubleHashStrategy, HashAlgorithm, HashStrategy},
    map::{config::TableConfig, AssocTable},
    memory::{KeyStore, ValueSlots},
    stats::{OperationCounters, TableStats},
    types::{KeyKind, SlotState},
};
use std::fmt;

/// 插入前若 `count == capacity / RESIZE_DIVISOR` 则先扩容（25% 负载）
pub const RESIZE_DIVISOR: usize = 4;

/// 单次落位结果
enum Seat<V> {
    Placed,
    /// 踢出链无法终止，表未被修改，值原样退回
    Blocked(V),
}

/// 计算从 `start` 开始的踢出路径
///
/// `occupant` 返回槽位占用者的两个候选槽位，空槽位返回 `None`。路径以一个空槽位
/// 结尾；超过 `max_depth` 次搬移或回到已访问槽位时返回 `None`。
fn kick_path<F>(start: usize, max_depth: usize, mut occupant: F) -> Option<Vec<usize>>
where
    F: FnMut(usize) -> Option<(usize, usize)>,
{
    let mut path = Vec::with_capacity(max_depth.min(64) + 1);
    path.push(start);
    let mut buckets = occupant(start)?;

    loop {
        if path.len() > max_depth {
            return None;
        }
        let current = path[path.len() - 1];
        let next = alternate_bucket(buckets, current);
        if path.contains(&next) {
            return None;
        }
        path.push(next);
        match occupant(next) {
            None => return Some(path),
            Some(next_buckets) => buckets = next_buckets,
        }
    }
}

/// Cuckoo哈希表
///
/// 不支持删除。值由调用方决定其所有权：以 `&T` 作为 `V` 时表只保存引用。
pub struct CuckooTable<V> {
    keys: KeyStore,
    values: ValueSlots<V>,
    capacity: usize,
    count: usize,
    hasher: DoubleHashStrategy,
    config: TableConfig,
    counters: OperationCounters,
}

impl<V> CuckooTable<V> {
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
            hasher: DoubleHashStrategy::new(config.hash_algorithm),
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

    /// 当前哈希算法（踢出失败后会从经典哈希换成带种子的哈希）
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    #[inline]
    fn locate(&self, key: &[u8]) -> (usize, usize) {
        self.hasher.locate_buckets(key, self.capacity)
    }

    /// 只检查两个候选槽位
    fn find(&self, key: &[u8]) -> Option<usize> {
        let (a, b) = self.locate(key);
        [a, b]
            .into_iter()
            .find(|&slot| self.values.get(slot).is_occupied() && self.keys.equals(slot, key))
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
    /// 一次插入（含其中的扩容）最多更换 `max_rehash_attempts` 次哈希函数。
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<(), AssocError> {
        self.keys.kind().validate(key)?;

        let mut reseeds_left = self.config.max_rehash_attempts;
        if self.count == self.capacity / RESIZE_DIVISOR {
            self.grow(&mut reseeds_left)?;
        }

        if let Some(slot) = self.find(key) {
            self.values.replace(slot, value);
            self.counters.update_count += 1;
            return Ok(());
        }

        let mut pending = value;
        loop {
            match self.seat(key, pending)? {
                Seat::Placed => {
                    self.count += 1;
                    self.counters.insert_count += 1;
                    return Ok(());
                }
                Seat::Blocked(value) => {
                    pending = value;
                    log_warn!(
                        "cuckoo kick path failed at capacity {}, rehashing ({} reseeds left)",
                        self.capacity,
                        reseeds_left
                    );
                    self.rebuild(self.capacity, true, &mut reseeds_left)?;
                }
            }
        }
    }

    /// 把新条目放入主槽位、备槽位，或踢出备槽位占用者后放入备槽位
    fn seat(&mut self, key: &[u8], value: V) -> Result<Seat<V>, AssocError> {
        let (a, b) = self.locate(key);

        let target = if !self.values.get(a).is_occupied() {
            a
        } else if !self.values.get(b).is_occupied() {
            b
        } else {
            let path = {
                let (keys, values, hasher, capacity) =
                    (&self.keys, &self.values, &self.hasher, self.capacity);
                kick_path(b, self.config.max_kick_depth, |slot| {
                    values
                        .get(slot)
                        .is_occupied()
                        .then(|| hasher.locate_buckets(keys.read(slot), capacity))
                })
            };
            let Some(path) = path else {
                return Ok(Seat::Blocked(value));
            };

            // 从链尾开始搬移，每一步的目标槽位都已空出
            for step in path.windows(2).rev() {
                self.keys.relocate(step[0], step[1]);
                self.values.relocate(step[0], step[1]);
            }
            self.counters.kick_count += (path.len() - 1) as u64;
            log_debug!("cuckoo kicked {} entries starting at slot {}", path.len() - 1, b);
            b
        };

        self.keys.store(target, key)?;
        self.values.occupy(target, value);
        Ok(Seat::Placed)
    }

    /// 容量翻倍并重建
    fn grow(&mut self, reseeds_left: &mut usize) -> Result<(), AssocError> {
        let new_capacity = self.capacity * 2;
        log_info!(
            "cuckoo table resizing from {} to {} (count={})",
            self.capacity,
            new_capacity,
            self.count
        );
        self.rebuild(new_capacity, false, reseeds_left)?;
        self.counters.resize_count += 1;
        Ok(())
    }

    /// 把全部条目重新放入 `new_capacity` 个槽位的新存储
    ///
    /// 先只用索引规划每个条目的新位置，规划成功后才搬移数据。每次更换哈希函数
    /// 消耗一次 `reseeds_left`，耗尽时返回 `EvictionCycle`，表和哈希函数保持原样。
    /// 重建不改变 `count`，字符串键句柄直接转移。
    fn rebuild(
        &mut self,
        new_capacity: usize,
        mut reseed: bool,
        reseeds_left: &mut usize,
    ) -> Result<(), AssocError> {
        let live: Vec<usize> = self.values.occupied().collect();
        let mut new_keys = KeyStore::with_capacity(self.keys.kind(), new_capacity)?;
        let mut new_values = ValueSlots::with_capacity(new_capacity)?;

        let mut candidates = Vec::new();
        candidates.try_reserve_exact(live.len()).map_err(|e| {
            AssocError::allocation(live.len() * std::mem::size_of::<(usize, usize)>(), e)
        })?;
        let mut plan: Vec<Option<usize>> = Vec::new();
        plan.try_reserve_exact(new_capacity).map_err(|e| {
            AssocError::allocation(new_capacity * std::mem::size_of::<Option<usize>>(), e)
        })?;
        plan.resize(new_capacity, None);

        let original = self.hasher.clone();
        loop {
            if reseed {
                if *reseeds_left == 0 {
                    break;
                }
                *reseeds_left -= 1;
                self.hasher.reseed();
                self.counters.reseed_count += 1;
                log_info!(
                    "cuckoo table reseeded: algorithm={:?}, seed={}",
                    self.hasher.algorithm(),
                    self.hasher.seed()
                );
            }
            if self.plan_rebuild(&live, &mut candidates, &mut plan, new_capacity) {
                for (new_slot, entry) in plan.iter().enumerate() {
                    let Some(entry) = *entry else { continue };
                    let old_slot = live[entry];
                    self.keys.move_to(old_slot, &mut new_keys, new_slot);
                    if let SlotState::Occupied(value) = self.values.take(old_slot) {
                        new_values.occupy(new_slot, value);
                    }
                }
                self.keys = new_keys;
                self.values = new_values;
                self.capacity = new_capacity;
                self.counters.rehash_count += 1;
                return Ok(());
            }
            reseed = true;
        }

        self.hasher = original;
        log_error!("cuckoo rebuild to capacity {} failed, reseed budget exhausted", new_capacity);
        Err(AssocError::EvictionCycle {
            depth: self.config.max_kick_depth,
            capacity: new_capacity,
        })
    }

    /// 在 `plan`（新槽位 -> `live` 下标）上模拟逐条插入
    fn plan_rebuild(
        &self,
        live: &[usize],
        candidates: &mut Vec<(usize, usize)>,
        plan: &mut [Option<usize>],
        capacity: usize,
    ) -> bool {
        candidates.clear();
        candidates.extend(
            live.iter()
                .map(|&slot| self.hasher.locate_buckets(self.keys.read(slot), capacity)),
        );
        plan.fill(None);

        for entry in 0..live.len() {
            let (a, b) = candidates[entry];
            let target = if plan[a].is_none() {
                a
            } else if plan[b].is_none() {
                b
            } else {
                let path = kick_path(b, self.config.max_kick_depth, |slot| {
                    plan[slot].map(|other| candidates[other])
                });
                let Some(path) = path else {
                    return false;
                };
                for step in path.windows(2).rev() {
                    plan[step[1]] = plan[step[0]].take();
                }
                b
            };
            plan[target] = Some(entry);
        }
        true
    }

    /// 统计快照
    pub fn stats(&self) -> TableStats {
        TableStats::snapshot(self.count, self.capacity, 0, &self.counters)
    }
}

impl<V> AssocTable<V> for CuckooTable<V> {
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

impl<V> fmt::Debug for CuckooTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooTable")
            .field("key_kind", &self.key_kind())
            .field("count", &self.count)
            .field("capacity", &self.capacity)
            .field("hash_algorithm", &self.hasher.algorithm())
            .finish()
    }
}
