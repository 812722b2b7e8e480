use std::fmt;
use std::mem;
use std::ops::{Add, Deref, DerefMut};
use std::ptr;
use std::slice;

mod error;
mod narrate;
mod raw;

pub use error::{AllocError, PushError, ShapeError};
pub use narrate::{Console, Event, Narrator, Recorder, SharedNarrator};

use raw::RawBuf;

/// 基于 RAII 的动态数组实现
///
/// 缓冲区由数组独占：复制（`Clone`）时深拷贝，移动（`take` / `assign_move`）时
/// 整体转移，赋值统一经由 `swap` 完成。标签与旁白（narrator）属于实例本身，
/// 不随缓冲区交换。
pub struct DynamicArray<T> {
    buf: RawBuf<T>,
    len: usize,
    label: String,
    narrator: Option<SharedNarrator>,
}

impl<T> DynamicArray<T> {
    /// 创建容量为 1 的空数组
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// 创建具有指定初始容量的空数组，容量至少为 1
    ///
    /// # Panics
    ///
    /// 容量溢出或分配失败时 panic；需要可恢复的错误请使用 [`try_with_capacity`](Self::try_with_capacity)。
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(arr) => arr,
            Err(_) => panic!("Capacity overflow: cannot allocate {capacity} slots"),
        }
    }

    /// 尝试创建具有指定初始容量的空数组（OOM 防护接口）
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let buf = RawBuf::allocate(capacity.max(1))?;
        Ok(Self {
            buf,
            len: 0,
            label: String::new(),
            narrator: None,
        })
    }

    /// 创建带显示标签的空数组，容量 0 按 1 处理
    pub fn labeled(label: impl Into<String>, capacity: usize) -> Self {
        let mut arr = Self::with_capacity(capacity);
        arr.label = label.into();
        arr
    }

    /// 挂接旁白，之后的每次资源操作都会产生一个 [`Event`]
    pub fn with_narrator(mut self, narrator: SharedNarrator) -> Self {
        self.narrator = Some(narrator);
        self.narrate(Event::Constructed {
            capacity: self.capacity(),
        });
        self
    }

    /// 不拥有任何内存的空数组，仅作为移出后的残留状态
    fn unallocated(label: String, narrator: Option<SharedNarrator>) -> Self {
        Self {
            buf: RawBuf::dangling(),
            len: 0,
            label,
            narrator,
        }
    }

    /// 获取当前元素数量
    pub fn len(&self) -> usize {
        self.len
    }

    /// 获取当前容量
    pub fn capacity(&self) -> usize {
        self.buf.cap()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// 剩余空槽位数
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.len
    }

    /// 最后一个已占用槽位的下标；空数组返回 `None`
    pub fn last_index(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rename(&mut self, label: impl Into<String>) {
        let from = mem::replace(&mut self.label, label.into());
        if self.narrator.is_some() {
            let from = if from.is_empty() {
                UNNAMED.to_string()
            } else {
                from
            };
            self.narrate(Event::Renamed {
                from,
                to: self.display_label().to_string(),
            });
        }
    }

    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// 在末尾添加元素；满时按 `2 * capacity + 1` 增长
    ///
    /// 增长失败时该操作不生效：元素被丢弃，并通过旁白报告。
    /// 需要取回元素请使用 [`try_push`](Self::try_push)。
    pub fn push(&mut self, elem: T) {
        // 失败已由 try_push 报告
        let _ = self.try_push(elem);
    }

    /// 在末尾添加元素，增长失败时把元素连同错误一起交还
    pub fn try_push(&mut self, elem: T) -> Result<(), PushError<T>> {
        if self.is_full() {
            if let Err(source) = self.grow() {
                self.narrate(Event::PushRejected {
                    len: self.len,
                    capacity: self.capacity(),
                });
                return Err(PushError::new(elem, source));
            }
        }
        match self.push_within_capacity(elem) {
            Ok(()) => Ok(()),
            Err(elem) => Err(PushError::new(elem, AllocError)),
        }
    }

    /// 弹出末尾元素
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            unsafe {
                // SAFETY: len 已减 1，该位置是有效的已初始化元素
                Some(ptr::read(self.buf.ptr().add(self.len)))
            }
        }
    }

    /// 析构所有元素，保留容量
    pub fn clear(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        unsafe {
            // 先把 len 置 0，元素析构 panic 时也不会二次析构
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr(), len));
        }
    }

    /// 显式改变容量
    ///
    /// 容量 0 按 1 处理。新容量小于当前元素数时，超出部分被析构，`len` 截断为新容量。
    /// 分配失败时返回错误，数组保持原状。
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        let new_capacity = new_capacity.max(1);
        let from = self.capacity();
        match self.relocate(new_capacity) {
            Ok(()) => {
                self.narrate(Event::Resized {
                    from,
                    to: new_capacity,
                    len: self.len,
                });
                Ok(())
            }
            Err(err) => {
                self.narrate(Event::ResizeFailed {
                    requested: new_capacity,
                });
                Err(err)
            }
        }
    }

    /// 常数时间交换缓冲区、容量与长度；标签与旁白保持不动
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buf, &mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
        self.narrate(Event::Swapped);
    }

    /// 移出缓冲区的所有权，自身留下容量为 0 的空数组
    ///
    /// 移出后的数组仍可正常使用：下一次 push 会重新分配。
    pub fn take(&mut self) -> Self {
        let mut taken = Self::unallocated(self.label.clone(), self.narrator.clone());
        let (len, capacity) = (self.len, self.capacity());
        taken.swap(self);
        self.narrate(Event::Taken { len, capacity });
        taken
    }

    /// 按值赋值：`value` 换入自身，原有缓冲区随 `value` 离开作用域时释放
    pub fn assign(&mut self, mut value: Self) {
        value.swap(self);
        self.narrate(Event::Assigned {
            len: self.len,
            capacity: self.capacity(),
        });
    }

    /// 复制赋值：先深拷贝，再按值赋值
    pub fn assign_copy(&mut self, source: &Self)
    where
        T: Clone,
    {
        self.assign(source.clone());
    }

    /// 移动赋值：接管 `source` 的缓冲区，`source` 变为空数组
    pub fn assign_move(&mut self, source: &mut Self) {
        self.assign(source.take());
    }

    /// 逐元素相加，返回新数组
    ///
    /// 任一操作数为空或长度不同时返回空数组（容量 1）；调用方需检查 `is_empty()`。
    pub fn elementwise_add(&self, other: &Self) -> Self
    where
        T: Clone + Add<Output = T>,
    {
        match self.checked_add(other) {
            Ok(sum) => sum,
            Err(err) => {
                self.narrate(Event::AddRejected {
                    left: err.left,
                    right: err.right,
                });
                Self::new()
            }
        }
    }

    /// 逐元素相加，形状不符时返回 [`ShapeError`]
    pub fn checked_add(&self, other: &Self) -> Result<Self, ShapeError>
    where
        T: Clone + Add<Output = T>,
    {
        if self.is_empty() || other.is_empty() || self.len != other.len {
            return Err(ShapeError {
                left: self.len,
                right: other.len,
            });
        }

        let mut sum = Self::with_capacity(self.len);
        sum.label = String::from("sum");
        sum.narrator = self.narrator.clone();
        for (a, b) in self.iter().zip(other.iter()) {
            let pushed = sum.push_within_capacity(a.clone() + b.clone());
            debug_assert!(pushed.is_ok());
        }
        Ok(sum)
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.deref().iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.deref_mut().iter_mut()
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        let from = self.capacity();
        let to = from
            .checked_mul(2)
            .and_then(|c| c.checked_add(1))
            .ok_or(AllocError)?;
        self.relocate(to)?;
        self.narrate(Event::Grew { from, to });
        Ok(())
    }

    /// 分配新内存块并把前 `min(len, new_cap)` 个元素搬过去
    fn relocate(&mut self, new_cap: usize) -> Result<(), AllocError> {
        let new_buf = RawBuf::allocate(new_cap)?;
        let old_len = self.len;
        let keep = old_len.min(new_cap);

        unsafe {
            // SAFETY: 新旧内存块互不重叠，且新块至少能容纳 keep 个元素
            ptr::copy_nonoverlapping(self.buf.ptr(), new_buf.ptr(), keep);
        }
        let old_buf = mem::replace(&mut self.buf, new_buf);
        self.len = keep;

        unsafe {
            // 旧块中只剩被截断的尾部元素仍需析构
            let tail = old_buf.ptr().add(keep);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail, old_len - keep));
        }
        // old_buf 在此释放；即使上面的析构 panic，展开时也会释放
        Ok(())
    }

    /// 不增长地写入末尾；已满时原样交还元素
    fn push_within_capacity(&mut self, elem: T) -> Result<(), T> {
        if self.is_full() {
            return Err(elem);
        }
        unsafe {
            // SAFETY: len < cap，目标槽位在已分配范围内且未初始化
            ptr::write(self.buf.ptr().add(self.len), elem);
        }
        // 异常安全：只有在写入成功后才增加 len
        self.len += 1;
        Ok(())
    }

    fn display_label(&self) -> &str {
        if self.label.is_empty() {
            UNNAMED
        } else {
            &self.label
        }
    }

    fn narrate(&self, event: Event) {
        if let Some(narrator) = &self.narrator {
            narrator.narrate(self.display_label(), &event);
        }
    }
}

const UNNAMED: &str = "Unnamed array";

/// 交换两个数组的缓冲区
pub fn swap<T>(a: &mut DynamicArray<T>, b: &mut DynamicArray<T>) {
    a.swap(b);
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        self.narrate(Event::Dropped {
            len: self.len,
            capacity: self.capacity(),
        });
        // 1. 析构所有有效元素；2. 内存块随 buf 字段一起释放
        self.clear();
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// 深拷贝；副本容量收缩为元素数（至少为 1）
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        if !self.label.is_empty() {
            copy.label = String::from("copy");
        }
        copy.narrator = self.narrator.clone();
        // clone panic 时，已写入的元素由 copy 的 Drop 负责析构
        for elem in self.iter() {
            let pushed = copy.push_within_capacity(elem.clone());
            debug_assert!(pushed.is_ok());
        }
        copy.narrate(Event::Copied {
            from: self.display_label().to_string(),
            len: copy.len,
        });
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_copy(source);
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        // SAFETY: 前 len 个槽位已初始化；空数组时指针为对齐的悬垂指针，长度为 0 合法
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, 'b, T> Add<&'b DynamicArray<T>> for &'a DynamicArray<T>
where
    T: Clone + Add<Output = T>,
{
    type Output = DynamicArray<T>;

    fn add(self, rhs: &'b DynamicArray<T>) -> DynamicArray<T> {
        self.elementwise_add(rhs)
    }
}

/// 只比较内容，不比较容量与标签
impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self[..] == other[..]
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("label", &self.display_label())
            .field("capacity", &self.capacity())
            .field("items", &&self[..])
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.display_label())?;
        if self.capacity() == 0 {
            return write!(f, "Size:0 empty");
        }
        write!(f, "Size:{} has {} items:", self.capacity(), self.len)?;
        for (i, elem) in self.iter().enumerate() {
            if i == 0 {
                write!(f, " {elem}")?;
            } else {
                write!(f, ", {elem}")?;
            }
        }
        if self.is_full() {
            write!(f, " (full)")
        } else {
            write!(f, " ({} slots left)", self.free_slots())
        }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::new();
        arr.extend(iter);
        arr
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            if self.try_push(elem).is_err() {
                panic!("Allocation failed");
            }
        }
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

// 迭代器支持
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        // 关键：先把缓冲区与长度移出，DynamicArray 的 Drop 只会看到空的悬垂块
        let end = mem::replace(&mut self.len, 0);
        let buf = mem::replace(&mut self.buf, RawBuf::dangling());
        IntoIter { buf, start: 0, end }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            unsafe {
                let result = ptr::read(self.buf.ptr().add(self.start));
                self.start += 1;
                Some(result)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        unsafe {
            // 析构剩余未消费的元素；内存块随 buf 释放
            let remaining = self.buf.ptr().add(self.start);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                remaining,
                self.end - self.start,
            ));
        }
    }
}

// 借用迭代器
impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests;
