//! 一致性累加器
//!
//! 在多次 `set` 调用之间跟踪唯一候选值：只要观察到的非空值始终相同，结果保持有效；
//! 一旦出现两个不同的非空值，累加器永久失效，最终值为 `None`。
//!
//! # 使用示例
//!
//! ```rust
//! use sqlscrub::utils::UniqueValue;
//!
//! let mut table = UniqueValue::new();
//! table.set(Some("users"));
//! table.set(None);
//! table.set(Some("users"));
//! assert_eq!(table.get(), Some("users"));
//!
//! table.set(Some("orders"));
//! assert_eq!(table.get(), None);
//! ```

/// 跟踪一组观测值是否一致的累加器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueValue<T> {
    value: Option<T>,
    valid: bool,
}

impl<T: PartialEq> UniqueValue<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            valid: true,
        }
    }

    /// 记录一个观测值
    ///
    /// `None` 不会使累加器失效，也不会覆盖已记录的值。
    pub fn set(&mut self, value: Option<T>) {
        if !self.valid {
            return;
        }
        let Some(value) = value else {
            return;
        };
        match &self.value {
            None => self.value = Some(value),
            Some(current) if *current == value => {}
            Some(_) => {
                self.value = None;
                self.valid = false;
            }
        }
    }

    /// 是否仍然有效（未出现冲突）
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// 取出最终值，冲突时为 `None`
    pub fn into_inner(self) -> Option<T> {
        if self.valid {
            self.value
        } else {
            None
        }
    }
}

impl<T: PartialEq + Copy> UniqueValue<T> {
    pub fn get(&self) -> Option<T> {
        if self.valid {
            self.value
        } else {
            None
        }
    }
}

impl<T: PartialEq> Default for UniqueValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<Option<T>> for UniqueValue<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        let mut unique = Self::new();
        for value in iter {
            unique.set(value);
        }
        unique
    }
}
