use std::mem::{size_of, MaybeUninit};

use crate::error::SortError;
#[cfg(feature = "multi-threaded")]
use rayon::prelude::*;

const COPY_CHUNK: usize = 1 << 16;

#[inline]
pub const fn cdiv(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

fn alloc_error<T>(len: usize, source: std::collections::TryReserveError) -> SortError {
    SortError::ScratchAllocation {
        bytes: len.saturating_mul(size_of::<T>()),
        source,
    }
}

/// Allocate `len` elements produced by `f`, reporting allocation failure
/// instead of aborting.
pub fn try_alloc_with<T, F>(len: usize, f: F) -> Result<Vec<T>, SortError>
where
    F: FnMut() -> T,
{
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|e| alloc_error::<T>(len, e))?;
    v.resize_with(len, f);

    Ok(v)
}

/// Allocate a scratch copy of `src`.
pub fn try_copy<T: Copy>(src: &[T]) -> Result<Vec<T>, SortError> {
    let mut v = Vec::new();
    v.try_reserve_exact(src.len())
        .map_err(|e| alloc_error::<T>(src.len(), e))?;
    v.extend_from_slice(src);

    Ok(v)
}

/// Reserve `len` uninitialized elements without touching their memory.
pub fn try_alloc_uninit<T>(len: usize) -> Result<Vec<MaybeUninit<T>>, SortError> {
    try_alloc_with(len, MaybeUninit::uninit)
}

/// View a scratch buffer as initialized.
///
/// # Safety
///
/// Every element of `s` must have been written.
#[inline]
pub unsafe fn slice_assume_init<T>(s: &[MaybeUninit<T>]) -> &[T] {
    std::slice::from_raw_parts(s.as_ptr() as *const T, s.len())
}

/// Copy `src` into `dst`, in parallel when allowed.
#[inline]
pub fn copy_back<T>(dst: &mut [T], src: &[T], multi_threaded: bool)
where
    T: Copy + Send + Sync,
{
    debug_assert_eq!(dst.len(), src.len());

    #[cfg(feature = "multi-threaded")]
    {
        if multi_threaded && dst.len() > COPY_CHUNK {
            dst.par_chunks_mut(COPY_CHUNK)
                .zip(src.par_chunks(COPY_CHUNK))
                .for_each(|(chunk, tmp_chunk)| {
                    chunk.copy_from_slice(tmp_chunk);
                });

            return;
        }
    }

    #[cfg(not(feature = "multi-threaded"))]
    let _ = (multi_threaded, COPY_CHUNK);

    dst.copy_from_slice(src);
}
