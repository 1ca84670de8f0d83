//! 键存储 - 字符串键持有句柄，定长键内联在连续字节缓冲中

use crate::{error::AssocError, types::KeyKind};
use std::ops::Range;

/// 键存储
///
/// 槽位是否占用由值数组决定；这里只负责与值同步写入、读取和清除键内存。
#[derive(Debug)]
pub enum KeyStore {
    /// 每个槽位一个独占的字符串句柄，空槽位为 `None`
    Strings(Vec<Option<Box<[u8]>>>),
    /// `capacity * size` 字节的扁平缓冲
    Fixed { size: usize, bytes: Vec<u8> },
}

impl KeyStore {
    /// 按键种类分配 `capacity` 个槽位的键存储
    pub fn with_capacity(kind: KeyKind, capacity: usize) -> Result<Self, AssocError> {
        match kind {
            KeyKind::String => {
                let mut handles = Vec::new();
                handles.try_reserve_exact(capacity).map_err(|e| {
                    let size = capacity.saturating_mul(std::mem::size_of::<Option<Box<[u8]>>>());
                    AssocError::allocation(size, e)
                })?;
                handles.resize_with(capacity, || None);
                Ok(Self::Strings(handles))
            }
            KeyKind::Fixed(0) => Err(AssocError::InvalidConfig {
                reason: "定长键长度必须大于 0".into(),
            }),
            KeyKind::Fixed(size) => {
                let total = size
                    .checked_mul(capacity)
                    .ok_or(AssocError::AllocationFailed { size: usize::MAX })?;
                let mut bytes = Vec::new();
                bytes
                    .try_reserve_exact(total)
                    .map_err(|e| AssocError::allocation(total, e))?;
                bytes.resize(total, 0);
                Ok(Self::Fixed { size, bytes })
            }
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Strings(_) => KeyKind::String,
            Self::Fixed { size, .. } => KeyKind::Fixed(*size),
        }
    }

    /// 槽位数量
    pub fn capacity(&self) -> usize {
        match self {
            Self::Strings(handles) => handles.len(),
            Self::Fixed { size, bytes } => bytes.len() / size,
        }
    }

    /// 槽位在扁平缓冲中的字节区间，偏移计算只在这里进行
    #[inline]
    fn span(size: usize, slot: usize) -> Range<usize> {
        let start = slot * size;
        start..start + size
    }

    /// 写入键：字符串键克隆一份新内存并释放原占用者，定长键拷贝 `size` 字节
    pub fn store(&mut self, slot: usize, key: &[u8]) -> Result<(), AssocError> {
        match self {
            Self::Strings(handles) => {
                handles[slot] = Some(clone_key(key)?);
            }
            Self::Fixed { size, bytes } => {
                debug_assert_eq!(key.len(), *size);
                bytes[Self::span(*size, slot)].copy_from_slice(key);
            }
        }
        Ok(())
    }

    /// 读取槽位中的键字节；空的字符串槽位返回空切片
    pub fn read(&self, slot: usize) -> &[u8] {
        match self {
            Self::Strings(handles) => handles[slot].as_deref().unwrap_or(&[]),
            Self::Fixed { size, bytes } => &bytes[Self::span(*size, slot)],
        }
    }

    /// 比较槽位中的键
    pub fn equals(&self, slot: usize, key: &[u8]) -> bool {
        match self {
            Self::Strings(handles) => handles[slot].as_deref() == Some(key),
            Self::Fixed { .. } => self.read(slot) == key,
        }
    }

    /// 清除槽位：释放字符串句柄，或将定长区间清零
    pub fn clear(&mut self, slot: usize) {
        match self {
            Self::Strings(handles) => handles[slot] = None,
            Self::Fixed { size, bytes } => bytes[Self::span(*size, slot)].fill(0),
        }
    }

    /// 在同一存储内把键从 `from` 移到 `to`，不复制字符串内存
    pub fn relocate(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        match self {
            Self::Strings(handles) => handles[to] = handles[from].take(),
            Self::Fixed { size, bytes } => {
                let src = Self::span(*size, from);
                bytes.copy_within(src.clone(), to * *size);
                bytes[src].fill(0);
            }
        }
    }

    /// 把键移入另一个存储（扩容重建时使用），字符串句柄直接转移所有权
    pub fn move_to(&mut self, from: usize, dest: &mut KeyStore, to: usize) {
        match (self, dest) {
            (Self::Strings(src), Self::Strings(dst)) => dst[to] = src[from].take(),
            (Self::Fixed { size, bytes: src }, Self::Fixed { bytes: dst, .. }) => {
                let span = Self::span(*size, from);
                dst[Self::span(*size, to)].copy_from_slice(&src[span.clone()]);
                src[span].fill(0);
            }
            _ => unreachable!("键存储种类在建表时确定"),
        }
    }

    /// 已持有的字符串句柄数量（定长存储恒为 0）
    pub fn owned_strings(&self) -> usize {
        match self {
            Self::Strings(handles) => handles.iter().filter(|h| h.is_some()).count(),
            Self::Fixed { .. } => 0,
        }
    }
}

/// 克隆字符串键到新分配的内存
fn clone_key(key: &[u8]) -> Result<Box<[u8]>, AssocError> {
    let mut owned = Vec::new();
    owned
        .try_reserve_exact(key.len())
        .map_err(|e| AssocError::allocation(key.len(), e))?;
    owned.extend_from_slice(key);
    Ok(owned.into_boxed_slice())
}
