//! 核心类型定义 - 键种类、槽位状态和表类型

use crate::error::AssocError;
use std::fmt;

/// 键种类 - 建表时选定，之后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// 变长字符串键，表内持有一份拷贝
    String,
    /// 定长二进制键，按 `size` 字节内联存放
    Fixed(usize),
}

impl KeyKind {
    /// 由键长度选择键种类：0 表示字符串键
    pub const fn from_key_size(key_size: usize) -> Self {
        if key_size == 0 {
            Self::String
        } else {
            Self::Fixed(key_size)
        }
    }

    /// 还原为键长度表示
    pub const fn key_size(&self) -> usize {
        match self {
            Self::String => 0,
            Self::Fixed(size) => *size,
        }
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    /// 校验待插入的键
    pub fn validate(&self, key: &[u8]) -> Result<(), AssocError> {
        match self {
            Self::Fixed(size) if key.len() != *size => Err(AssocError::KeySizeMismatch {
                expected: *size,
                actual: key.len(),
            }),
            Self::Fixed(0) => Err(AssocError::InvalidConfig {
                reason: "定长键长度必须大于 0".into(),
            }),
            Self::String if key.contains(&0) => Err(AssocError::InvalidKey {
                reason: "字符串键包含 NUL 字节".into(),
            }),
            _ => Ok(()),
        }
    }

    /// 查找时键是否可能存在于此类表中
    pub fn admits(&self, key: &[u8]) -> bool {
        match self {
            Self::Fixed(size) => key.len() == *size,
            Self::String => !key.contains(&0),
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Fixed(size) => write!(f, "fixed({})", size),
        }
    }
}

/// 槽位状态
///
/// 值数组决定槽位占用情况，键存储只跟随它写入和清除。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState<V> {
    Empty,
    Occupied(V),
    /// 曾被占用、现已删除（仅线性探测表使用）
    Tombstone,
}

impl<V> Default for SlotState<V> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<V> SlotState<V> {
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    pub const fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstone)
    }

    /// 获取占用槽位中的值
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Occupied(value) => Some(value),
            _ => None,
        }
    }
}

/// 表类型 - 选择冲突解决策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Cuckoo,
    LinearProbe,
}
