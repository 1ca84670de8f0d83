//! 内存管理模块 - 键存储与值槽位数组

pub mod key_store;
pub mod slot;

pub use key_store::KeyStore;
pub use slot::ValueSlots;
