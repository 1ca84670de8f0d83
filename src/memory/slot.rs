//! 值槽位数组 - 记录每个槽位的占用状态和调用方的值

use crate::{error::AssocError, types::SlotState};

/// 值槽位数组
#[derive(Debug)]
pub struct ValueSlots<V> {
    slots: Vec<SlotState<V>>,
}

impl<V> ValueSlots<V> {
    /// 分配 `capacity` 个空槽位
    pub fn with_capacity(capacity: usize) -> Result<Self, AssocError> {
        let mut slots = Vec::new();
        let size = capacity.saturating_mul(std::mem::size_of::<SlotState<V>>());
        slots
            .try_reserve_exact(capacity)
            .map_err(|e| AssocError::allocation(size, e))?;
        slots.resize_with(capacity, SlotState::default);
        Ok(Self { slots })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> &SlotState<V> {
        &self.slots[slot]
    }

    #[inline]
    pub fn value(&self, slot: usize) -> Option<&V> {
        self.slots[slot].value()
    }

    /// 占用槽位，返回原状态
    pub fn occupy(&mut self, slot: usize, value: V) -> SlotState<V> {
        std::mem::replace(&mut self.slots[slot], SlotState::Occupied(value))
    }

    /// 替换已占用槽位的值，返回旧值
    pub fn replace(&mut self, slot: usize, value: V) -> Option<V> {
        match &mut self.slots[slot] {
            SlotState::Occupied(current) => Some(std::mem::replace(current, value)),
            _ => None,
        }
    }

    /// 取出槽位内容，槽位变为空
    pub fn take(&mut self, slot: usize) -> SlotState<V> {
        std::mem::take(&mut self.slots[slot])
    }

    /// 把占用槽位标记为墓碑，返回其中的值
    pub fn bury(&mut self, slot: usize) -> Option<V> {
        match std::mem::replace(&mut self.slots[slot], SlotState::Tombstone) {
            SlotState::Occupied(value) => Some(value),
            previous => {
                self.slots[slot] = previous;
                None
            }
        }
    }

    /// 在同一数组内搬移槽位内容
    pub fn relocate(&mut self, from: usize, to: usize) {
        if from != to {
            let state = self.take(from);
            self.slots[to] = state;
        }
    }

    /// 所有被占用槽位的索引
    pub fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_occupied())
            .map(|(slot, _)| slot)
    }

    /// 墓碑数量
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|state| state.is_tombstone()).count()
    }
}
