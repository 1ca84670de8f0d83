//! 内存所有权测试 - 统计分配字节，验证键内存恰好释放一次

use assoc_table::hash::strategy::seeded_hash;
use assoc_table::{AssocTable, CuckooTable, HashAlgorithm, ProbeTable};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

/// 只统计当前线程的分配，避免并行测试互相干扰
struct CountingAllocator;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + layout.size() as isize));
            let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        let _ = LIVE_BYTES.try_with(|live| live.set(live.get() - layout.size() as isize));
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn live_bytes() -> isize {
    LIVE_BYTES.with(Cell::get)
}

/// 测量起点
///
/// 表在踢出失败后会换用 AHash，其进程级随机源首次使用时分配一次且永不释放，
/// 先触发它，避免计入被测窗口。
fn measure_start() -> isize {
    seeded_hash(HashAlgorithm::AHash, 0, b"");
    live_bytes()
}

fn allocations() -> usize {
    ALLOCATIONS.with(Cell::get)
}

fn words(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("gingerbread-{}", i)).collect()
}

fn assert_released<T: AssocTable<usize>>(build: impl FnOnce() -> T, keys: &[String]) {
    let baseline = measure_start();
    {
        let mut table = build();
        for (i, key) in keys.iter().enumerate() {
            table.insert(key.as_bytes(), i).unwrap();
        }
        let key_bytes: usize = keys.iter().map(String::len).sum();
        assert!(
            live_bytes() - baseline >= key_bytes as isize,
            "表应持有每个键的独立拷贝"
        );
    }
    assert_eq!(live_bytes(), baseline, "销毁后所有键内存和缓冲区都应释放");
}

#[test]
fn test_cuckoo_releases_everything_on_drop() {
    let keys = words(500);
    assert_released(|| CuckooTable::new(0).unwrap(), &keys);
}

#[test]
fn test_probe_releases_everything_on_drop() {
    let keys = words(500);
    assert_released(|| ProbeTable::new(0).unwrap(), &keys);
}

#[test]
fn test_reseeded_table_releases_everything() {
    // 经典哈希下这些键完全冲突，表必然换用 AHash
    let keys: Vec<String> = (0..100).map(|i| format!("key_{}", i)).collect();
    assert_released(
        || {
            let table = CuckooTable::new(0).unwrap();
            assert_eq!(table.hash_algorithm(), HashAlgorithm::Classic);
            table
        },
        &keys,
    );
}

#[test]
fn test_fixed_keys_release_buffer() {
    let baseline = measure_start();
    {
        let mut table = CuckooTable::new(8).unwrap();
        for i in 0..300u64 {
            table.insert(&i.to_le_bytes(), i).unwrap();
        }
    }
    assert_eq!(live_bytes(), baseline);
}

#[test]
fn test_resize_does_not_clone_keys() {
    let keys = words(16);
    let mut table = CuckooTable::new(0).unwrap();
    for (i, key) in keys.iter().enumerate() {
        table.insert(key.as_bytes(), i).unwrap();
    }
    assert_eq!(table.capacity(), 64);

    // 第 17 次插入触发扩容：已有的 16 个键句柄直接转移，只新分配缓冲区和新键
    let before = allocations();
    table.insert(b"bauble", 16).unwrap();
    assert_eq!(table.capacity(), 128);
    assert!(allocations() - before < keys.len(), "扩容不应逐个克隆已有键");
}

#[test]
fn test_update_and_remove_release_exactly_once() {
    let mut table = ProbeTable::new(0).unwrap();
    table.insert(b"ornament", 1).unwrap();

    // 原地更新不再分配键内存
    let before = live_bytes();
    table.insert(b"ornament", 2).unwrap();
    assert_eq!(live_bytes(), before);

    // 删除释放键拷贝
    assert_eq!(table.remove(b"ornament"), Some(2));
    assert_eq!(live_bytes(), before - "ornament".len() as isize);
    assert_eq!(table.remove(b"ornament"), None);
    assert_eq!(live_bytes(), before - "ornament".len() as isize);
}

#[test]
fn test_values_are_dropped_with_table() {
    let baseline = measure_start();
    {
        let mut table = CuckooTable::new(0).unwrap();
        for i in 0..50 {
            table.insert(format!("star-{}", i).as_bytes(), vec![0u8; 64]).unwrap();
        }
    }
    assert_eq!(live_bytes(), baseline, "表拥有的值随表一起释放");
}
