use std::alloc::{alloc, dealloc, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::error::AllocError;

/// 独占所有权的原始内存块：只负责分配与释放，不关心其中哪些槽位已初始化。
///
/// 元素的析构由 `DynamicArray` 负责；`RawBuf` 被丢弃时只释放内存块本身，
/// 因此无论从哪条路径退出（正常返回、提前返回、panic 展开），内存都恰好释放一次。
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawBuf 独占其内存块，与 Box<[T]> 的线程语义相同
unsafe impl<T: Send> Send for RawBuf<T> {}
// SAFETY: 共享引用只能读取内存块，T: Sync 即可
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    /// 不拥有任何内存的空块（容量为 0），被移出后的数组使用它
    pub(crate) fn dangling() -> Self {
        assert!(mem::size_of::<T>() != 0, "Zero-sized types are not supported");
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// 分配 `cap` 个槽位；容量溢出或分配器返回空指针时报告 `AllocError`
    pub(crate) fn allocate(cap: usize) -> Result<Self, AllocError> {
        if cap == 0 {
            return Ok(Self::dangling());
        }
        assert!(mem::size_of::<T>() != 0, "Zero-sized types are not supported");

        let layout = Layout::array::<T>(cap).map_err(|_| AllocError)?;
        // SAFETY: cap > 0 且 T 不是 ZST，layout 大小非零
        let ptr = unsafe { alloc(layout) };
        let ptr = NonNull::new(ptr as *mut T).ok_or(AllocError)?;

        Ok(Self {
            ptr,
            cap,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.cap
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.cap == 0 {
            return;
        }
        // 分配时同一 layout 已通过校验
        if let Ok(layout) = Layout::array::<T>(self.cap) {
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, layout);
            }
        }
    }
}
