//! 通用 LRU 缓存实现
//!
//! 提供基于 LRU (Least Recently Used) 淘汰策略的缓存：
//! - 容量限制：超过容量自动淘汰最久未使用的项
//! - 非线程安全：并发访问由外层 [`BoundedCache`](super::BoundedCache) 加锁
//!
//! # 使用示例
//!
//! ```rust
//! use sqlscrub::data::cache::LruCache;
//!
//! let mut cache = LruCache::new(100);
//! cache.insert("key", "value");
//! assert_eq!(cache.get(&"key"), Some(&"value"));
//! ```

use linked_hash_map::LinkedHashMap;
use std::hash::Hash;

/// LRU 缓存实现
///
/// 使用 `LinkedHashMap` 保证插入顺序，实现 LRU 淘汰策略。
///
/// # 泛型参数
///
/// - `K`: 键类型，必须实现 `Eq + Hash`
/// - `V`: 值类型
#[derive(Debug)]
pub struct LruCache<K: Eq + Hash, V> {
    cache: LinkedHashMap<K, V>,
    capacity: usize,
}

impl<K: Eq + Hash, V> LruCache<K, V> {
    /// 创建新的 LRU 缓存
    ///
    /// 容量为 0 时按 1 处理，保证缓存至少能容纳一项。
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LinkedHashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// 获取缓存值，并将该项移至最近使用位置
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.cache.get_refresh(key).map(|value| &*value)
    }

    /// 只读查看，不刷新 LRU 位置
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.cache.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    /// 插入缓存值
    ///
    /// 如果键已存在，更新其值并刷新位置。
    /// 如果超过容量限制，自动淘汰最久未使用的项。
    pub fn insert(&mut self, key: K, value: V) {
        if self.cache.contains_key(&key) {
            self.cache.remove(&key);
        }

        if self.cache.len() >= self.capacity {
            self.cache.pop_front();
        }

        self.cache.insert(key, value);
    }

    /// 删除指定键
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.cache.remove(key)
    }

    /// 清空所有缓存
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
