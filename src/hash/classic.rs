//! 经典哈希函数 - 乘法累加与减法累加组合的非加密哈希
//!
//! 全部按 32 位有符号整数回绕运算，最后折叠为非负数。
//! 两个布谷鸟哈希只处理偶数长度前缀，奇数长度键的最后一个字节不参与计算。

/// 乘法累加的偏移量
const ADD_BUFFER: i32 = 3;
/// 乘法累加的初值
const HASH_SEED: i32 = 1;

/// 布谷鸟主哈希：`byte + 3` 的连乘减去逐字节的减法累加
pub fn cuckoo_primary(key: &[u8]) -> u32 {
    let even = key.len() & !1;
    let mut product = HASH_SEED;
    let mut sum = 0i32;

    for &byte in &key[..even] {
        product = product.wrapping_mul(i32::from(byte) + ADD_BUFFER);
        sum = sum.wrapping_sub(i32::from(byte));
    }
    product.wrapping_sub(sum).unsigned_abs()
}

/// 布谷鸟备哈希：按字节对取异或连乘，与字节对差值的减法累加再异或
pub fn cuckoo_secondary(key: &[u8]) -> u32 {
    let mut product = HASH_SEED;
    let mut sum = 0i32;

    for pair in key.chunks_exact(2) {
        let (lo, hi) = (signed(pair[0]), signed(pair[1]));
        product = product.wrapping_mul(lo ^ hi);
        sum = sum.wrapping_sub(lo - hi);
    }
    (product ^ sum).unsigned_abs()
}

/// 线性探测哈希：有符号字节 `+ 3` 的连乘，与倍增减法累加异或
pub fn probe(key: &[u8]) -> u32 {
    let mut product = HASH_SEED;
    let mut sum = 0i32;

    for &byte in key {
        let value = signed(byte);
        product = product.wrapping_mul(value.wrapping_add(ADD_BUFFER));
        sum = sum.wrapping_sub(value.wrapping_sub(sum));
    }
    (product ^ sum).unsigned_abs()
}

#[inline]
fn signed(byte: u8) -> i32 {
    i32::from(byte as i8)
}
