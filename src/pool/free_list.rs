//! Non-blocking free list.

use std::sync::{Mutex, MutexGuard, TryLockError};

/// A bounded stack of idle instances shared between threads.
///
/// Both [`pop`](Self::pop) and [`push`](Self::push) give up instead of
/// waiting when another thread holds the lock: a missed pop means the caller
/// builds a fresh instance, a missed push means the instance is dropped.
#[derive(Debug)]
pub(crate) struct FreeList<T> {
    slots: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T> FreeList<T> {
    pub fn new(max_idle: usize) -> Self {
        Self {
            slots: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
        }
    }

    /// Locks the list if it is free right now.
    ///
    /// The list only ever holds reset instances, so a poisoned lock is safe
    /// to keep using.
    fn try_slots(&self) -> Option<MutexGuard<'_, Vec<T>>> {
        match self.slots.try_lock() {
            Ok(slots) => Some(slots),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Takes an idle instance, if one is available without waiting.
    pub fn pop(&self) -> Option<T> {
        self.try_slots()?.pop()
    }

    /// Stores an instance. Hands it back if the list is full or busy.
    pub fn push(&self, item: T) -> Result<(), T> {
        match self.try_slots() {
            Some(mut slots) if slots.len() < self.max_idle => {
                slots.push(item);
                Ok(())
            }
            _ => Err(item),
        }
    }

    /// Number of idle instances.
    ///
    /// Unlike `pop` and `push` this waits for the lock, so the count is exact.
    pub fn len(&self) -> usize {
        match self.slots.lock() {
            Ok(slots) => slots.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn max_idle(&self) -> usize {
        self.max_idle
    }
}
