//! 统一错误处理 - 关联表可能返回的错误类型和恢复建议

use std::collections::TryReserveError;

/// 关联表操作可能发生的错误
///
/// 查找未命中、重复插入、达到负载阈值都属于正常控制流，不在此列。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssocError {
    #[error("内存分配失败 (请求字节数: {size})")]
    AllocationFailed {
        size: usize,
    },

    #[error("定长键长度不匹配 (期望: {expected}, 实际: {actual})")]
    KeySizeMismatch {
        expected: usize,
        actual: usize,
    },

    #[error("无效键: {reason}")]
    InvalidKey {
        reason: String,
    },

    #[error("踢出路径无法终止 (最大深度: {depth}, 容量: {capacity})")]
    EvictionCycle {
        depth: usize,
        capacity: usize,
    },

    #[error("探测表没有空闲槽位 (容量: {capacity})")]
    TableFull {
        capacity: usize,
    },

    #[error("无效配置: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

impl AssocError {
    /// 由 `try_reserve` 失败构造分配错误
    pub(crate) fn allocation(size: usize, _source: TryReserveError) -> Self {
        Self::AllocationFailed { size }
    }

    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::AllocationFailed { .. } => Some("检查系统内存或减小表大小"),
            Self::KeySizeMismatch { .. } => Some("按建表时的键长度传入键"),
            Self::InvalidKey { .. } => Some("字符串键不能包含 NUL 字节"),
            Self::EvictionCycle { .. } => Some("增加最大踢出深度或更换哈希算法"),
            Self::TableFull { .. } => Some("负载上限被破坏，重建该表"),
            Self::InvalidConfig { .. } => Some("检查配置参数"),
        }
    }

    /// 判断错误是否可恢复
    ///
    /// 分配失败之外的错误都不会破坏表状态，调用方可以继续使用该表。
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AllocationFailed { .. })
    }
}
