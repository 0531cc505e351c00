//! Deferred work: single-slot work items on a cooperative work queue.
//!
//! A work item is either Idle or Pending. Submitting an Idle item queues it;
//! submitting a Pending item does nothing, so a congested worker never
//! accumulates a backlog of the same work. The worker context pops items in
//! submission order, runs each body to completion, and only then returns the
//! item to Idle.
//!
//! Submission is safe from any context (timer, radio callback, task): the
//! queue and the pending flag are only touched inside a critical section.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::Deque;

/// Body of a deferred work item. Runs in the worker context only.
pub trait Work: Sync {
    fn run(&self);
}

impl<F: Fn() + Sync> Work for F {
    fn run(&self) {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkState {
    Idle,
    Pending,
}

/// Outcome of [`WorkQueue::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// The item was Idle and is now queued.
    Queued,
    /// The item was already pending; nothing changed.
    AlreadyPending,
    /// The queue has no free slot; the item stays Idle.
    Full,
}

pub struct WorkItem<'a> {
    pending: AtomicBool,
    work: &'a dyn Work,
}

impl<'a> WorkItem<'a> {
    pub const fn new(work: &'a dyn Work) -> Self {
        Self {
            pending: AtomicBool::new(false),
            work,
        }
    }

    pub fn state(&self) -> WorkState {
        if self.pending.load(Ordering::Acquire) {
            WorkState::Pending
        } else {
            WorkState::Idle
        }
    }
}

/// Cooperative FIFO of pending work items, at most `N` at a time.
pub struct WorkQueue<'a, const N: usize> {
    queue: Mutex<RefCell<Deque<&'a WorkItem<'a>, N>>>,
    executed: AtomicU32,
    coalesced: AtomicU32,
}

impl<'a, const N: usize> WorkQueue<'a, N> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
            executed: AtomicU32::new(0),
            coalesced: AtomicU32::new(0),
        }
    }

    /// Queue `item` unless it is already pending. Never blocks.
    pub fn submit(&self, item: &'a WorkItem<'a>) -> Submit {
        critical_section::with(|cs| {
            if item.pending.load(Ordering::Acquire) {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
                return Submit::AlreadyPending;
            }
            if self.queue.borrow_ref_mut(cs).push_back(item).is_err() {
                return Submit::Full;
            }
            item.pending.store(true, Ordering::Release);
            Submit::Queued
        })
    }

    /// Run the oldest pending item. Returns `false` if nothing was queued.
    ///
    /// The body runs outside the critical section. The item stays Pending
    /// until its body returns.
    pub fn run_next(&self) -> bool {
        let next = critical_section::with(|cs| self.queue.borrow_ref_mut(cs).pop_front());
        let Some(item) = next else {
            return false;
        };
        item.work.run();
        item.pending.store(false, Ordering::Release);
        self.executed.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Run items until the queue is empty, including any submitted while
    /// draining. Returns how many bodies ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bodies executed since creation.
    pub fn executed(&self) -> u32 {
        self.executed.load(Ordering::Relaxed)
    }

    /// Submissions absorbed because the item was already pending.
    pub fn coalesced(&self) -> u32 {
        self.coalesced.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for WorkQueue<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
