//! A CPU model of the accelerator the sorts are written against.
//!
//! A group is executed by a single worker. Its lanes advance in lock-step
//! phases, so a group barrier is the boundary between two phases and only
//! needs to be counted. Device memory is ordinary shared memory: counters and
//! synchronization slots are atomics, and bulk key/value buffers are wrapped in
//! [`SharedSlice`] so that many groups can scatter into disjoint positions of
//! the same buffer at once.
//!
//! Groups are launched in one of two ways:
//!
//!  * [`dispatch_ordered`] hands out group ids through a [`JobQueue`] to a
//!    fixed set of workers. Ids are claimed in increasing order by workers that
//!    are already running, so a group that waits on a lower id always waits on
//!    a group that is making progress.
//!  * [`dispatch_resident`] gives every group its own thread, so all groups are
//!    running at the same time. Required by anything that rendezvous across
//!    all groups.

use std::hint::spin_loop;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Execution context of one group.
pub struct Workgroup {
    id: usize,
    lanes: usize,
    barriers: usize,
}

impl Workgroup {
    pub fn new(id: usize, lanes: usize) -> Self {
        Self {
            id,
            lanes,
            barriers: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Group-wide barrier. Every lane has finished the previous phase once
    /// this returns.
    #[inline]
    pub fn barrier(&mut self) {
        self.barriers += 1;
    }

    #[inline]
    pub fn barriers(&self) -> usize {
        self.barriers
    }
}

/// Dynamic job queue handing out group ids in increasing order.
pub struct JobQueue {
    next: AtomicUsize,
    jobs: usize,
}

impl JobQueue {
    pub fn new(jobs: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            jobs,
        }
    }

    #[inline]
    pub fn claim(&self) -> Option<usize> {
        let id = self.next.fetch_add(1, Ordering::Relaxed);

        if id < self.jobs {
            Some(id)
        } else {
            None
        }
    }
}

/// Run `groups` groups on at most `workers` workers, claiming group ids from a
/// [`JobQueue`].
pub fn dispatch_ordered<F>(groups: usize, workers: usize, multi_threaded: bool, f: F)
where
    F: Fn(usize) + Sync,
{
    let queue = JobQueue::new(groups);
    let run = || {
        while let Some(g) = queue.claim() {
            f(g);
        }
    };

    #[cfg(feature = "multi-threaded")]
    {
        if multi_threaded && groups > 1 && workers > 1 {
            let workers = workers.min(groups);

            rayon::scope(|s| {
                for _ in 0..workers {
                    s.spawn(|_| run());
                }
            });

            return;
        }
    }

    #[cfg(not(feature = "multi-threaded"))]
    let _ = (workers, multi_threaded);

    run();
}

/// Run one group per element of `states` with one thread each, so that every
/// group is resident for the whole dispatch. Group `g` takes ownership of
/// `states[g]`.
pub fn dispatch_resident<S, F>(states: Vec<S>, f: F)
where
    S: Send,
    F: Fn(usize, S) + Sync,
{
    if states.len() == 1 {
        for state in states {
            f(0, state);
        }
        return;
    }

    let f = &f;
    thread::scope(|s| {
        for (g, state) in states.into_iter().enumerate() {
            s.spawn(move || f(g, state));
        }
    });
}

/// Busy wait with a bounded number of retries. Returns `false` if `ready` never
/// returned `true` within `retry_limit` attempts.
#[inline]
pub fn spin_until<F>(retry_limit: usize, mut ready: F) -> bool
where
    F: FnMut() -> bool,
{
    for attempt in 0..retry_limit {
        if ready() {
            return true;
        }

        if attempt % 64 == 63 {
            thread::yield_now();
        } else {
            spin_loop();
        }
    }

    ready()
}

/// A slice shared between groups that read and scatter concurrently.
///
/// Reads and writes go through raw pointers. Soundness relies on the
/// algorithms above: during a dispatch, every position is written by at most
/// one group and no position is read and written concurrently.
///
/// Sharing across groups hands out `&T`, so the element type must be `Sync`:
///
/// ```compile_fail
/// use dpsort::device::SharedSlice;
/// use std::cell::Cell;
///
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<SharedSlice<'static, Cell<u32>>>();
/// ```
pub struct SharedSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<'a, T: Send> Send for SharedSlice<'a, T> {}
unsafe impl<'a, T: Send + Sync> Sync for SharedSlice<'a, T> {}

impl<'a, T: Copy> SharedSlice<'a, T> {
    pub fn new(slice: &'a mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// Copy `src[start..start + out.len()]` into `out`.
    ///
    /// # Safety
    ///
    /// No other group may write to the range during the call.
    #[inline]
    pub unsafe fn read_into(&self, start: usize, out: &mut [T]) {
        assert!(start + out.len() <= self.len);
        std::ptr::copy_nonoverlapping(self.ptr.add(start), out.as_mut_ptr(), out.len());
    }

    /// View `len` elements starting at `start`.
    ///
    /// # Safety
    ///
    /// No group may write to the range while the returned slice is alive.
    #[inline]
    pub unsafe fn slice(&self, start: usize, len: usize) -> &[T] {
        assert!(start + len <= self.len);
        std::slice::from_raw_parts(self.ptr.add(start), len)
    }

    /// Write `value` at `index`. Writes beyond the end are discarded.
    ///
    /// # Safety
    ///
    /// No other group may read or write `index` during the call.
    #[inline]
    pub unsafe fn scatter(&self, index: usize, value: T) {
        if index < self.len {
            self.ptr.add(index).write(value);
        }
    }
}
