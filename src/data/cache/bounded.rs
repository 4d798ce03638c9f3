//! 带旁路规则的有界缓存
//!
//! 在 [`LruCache`] 外包一层读写锁，提供 compute-if-absent 语义：
//! - 容量限制：由 LRU 淘汰保证内存上界
//! - 旁路规则：命中旁路谓词的键既不查询也不写入，每次直接计算
//! - 线程安全：命中只取读锁；计算在锁外进行，并发下同一个键可能被重复计算，但写入的值等价
//!
//! # 使用示例
//!
//! ```rust
//! use sqlscrub::data::cache::BoundedCache;
//!
//! let cache = BoundedCache::new(100, |key: &String| key.len() > 16);
//! let value = cache.get_or_compute("short".to_string(), |k| k.len());
//! assert_eq!(value, 5);
//! assert!(cache.contains(&"short".to_string()));
//! ```

use super::LruCache;
use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;

type BypassFn<K> = Box<dyn Fn(&K) -> bool + Send + Sync>;

/// 有界缓存
pub struct BoundedCache<K: Eq + Hash, V> {
    cache: RwLock<LruCache<K, V>>,
    bypass: BypassFn<K>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// 创建新的有界缓存
    ///
    /// # 参数
    ///
    /// - `capacity`: 最大条目数
    /// - `bypass`: 返回 `true` 的键不进入缓存
    pub fn new<F>(capacity: usize, bypass: F) -> Self
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
    {
        let cache = LruCache::new(capacity);
        let capacity = cache.capacity();
        Self {
            cache: RwLock::new(cache),
            bypass: Box::new(bypass),
            capacity,
        }
    }

    /// 不带旁路规则的有界缓存
    pub fn without_bypass(capacity: usize) -> Self {
        Self::new(capacity, |_| false)
    }

    /// 查询缓存，未命中时调用 `compute` 计算并写入
    ///
    /// 锁中毒时退化为直接计算，不向调用方传播错误。
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        if (self.bypass)(&key) {
            tracing::trace!("缓存旁路，直接计算");
            return compute(&key);
        }

        // 命中走读锁，多个读者可并发；LRU 位置只在写锁空闲时刷新
        let hit = match self.cache.read() {
            Ok(cache) => cache.peek(&key).cloned(),
            Err(_) => {
                tracing::warn!("缓存锁已中毒，跳过缓存");
                return compute(&key);
            }
        };
        if let Some(value) = hit {
            if let Ok(mut cache) = self.cache.try_write() {
                cache.get(&key);
            }
            return value;
        }

        // 计算放在锁外，避免慢计算阻塞其他线程
        let value = compute(&key);

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, value.clone());
        }

        value
    }

    /// 只读探测键是否已缓存，不刷新 LRU 位置
    pub fn contains(&self, key: &K) -> bool {
        self.cache
            .read()
            .map(|cache| cache.contains_key(key))
            .unwrap_or(false)
    }

    /// 该键是否会被旁路
    pub fn bypasses(&self, key: &K) -> bool {
        (self.bypass)(key)
    }

    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 清空所有缓存
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}

impl<K: Eq + Hash, V> fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.cache.read().map(|c| c.len()).unwrap_or(0);
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("len", &len)
            .finish()
    }
}
