//! Mutual exclusion with a blocking wait facility.
//!
//! [`ExclusionLock`] serializes access to the shared queue across the two
//! endpoints. The acquisition discipline is spin-then-block: a caller first
//! makes one non-blocking attempt and only enters the wait path when the lock
//! is observed held. Releasing wakes every suspended waiter; the first one to
//! re-attempt acquisition wins and the rest re-suspend, so there is no
//! fairness guarantee and no ordering among waiters. There is no timeout on
//! acquisition.

use parking_lot::{Condvar, Mutex};
use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

/// A mutual-exclusion lock guarding a value of type `T`.
///
/// The held flag lives behind a short-critical-section `parking_lot` mutex;
/// blocked callers suspend on the associated condvar rather than spinning.
/// The protected value is only reachable through an [`ExclusionGuard`], which
/// exists exactly while the flag is held.
pub struct ExclusionLock<T> {
    held: Mutex<bool>,
    released: Condvar,
    value: UnsafeCell<T>,
}

// The guard grants exclusive access to `value` only while `held` is set, so
// sharing the lock across threads is sound whenever T itself can be sent.
unsafe impl<T: Send> Send for ExclusionLock<T> {}
unsafe impl<T: Send> Sync for ExclusionLock<T> {}

impl<T> ExclusionLock<T> {
    /// Create a lock protecting `value`.
    pub fn new(value: T) -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Non-blocking acquisition attempt.
    ///
    /// Returns a guard if the lock was free, `None` if another caller holds
    /// it. Never suspends.
    pub fn try_acquire(&self) -> Option<ExclusionGuard<'_, T>> {
        let mut held = self.held.lock();
        if *held {
            return None;
        }
        *held = true;
        Some(ExclusionGuard { lock: self })
    }

    /// Acquire the lock, suspending the caller until it becomes available.
    ///
    /// The caller is woken whenever a holder releases and must re-validate
    /// the flag before proceeding; a woken caller that loses the race to a
    /// faster acquirer simply suspends again.
    pub fn acquire(&self) -> ExclusionGuard<'_, T> {
        let mut held = self.held.lock();
        while *held {
            self.released.wait(&mut held);
        }
        *held = true;
        ExclusionGuard { lock: self }
    }
}

/// RAII guard over the value protected by an [`ExclusionLock`].
///
/// Dropping the guard releases the lock and wakes all suspended waiters.
pub struct ExclusionGuard<'a, T> {
    lock: &'a ExclusionLock<T>,
}

impl<T> Deref for ExclusionGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Exclusive by construction: the held flag is set for this guard.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for ExclusionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for ExclusionGuard<'_, T> {
    fn drop(&mut self) {
        *self.lock.held.lock() = false;
        // Wake the whole wait set; winners re-check, losers re-suspend.
        self.lock.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_try_acquire_fails_while_held() {
        let lock = ExclusionLock::new(0u32);
        let guard = lock.try_acquire().unwrap();
        assert!(lock.try_acquire().is_none());
        drop(guard);
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn test_guard_grants_mutable_access() {
        let lock = ExclusionLock::new(vec![1, 2, 3]);
        {
            let mut guard = lock.acquire();
            guard.push(4);
        }
        assert_eq!(*lock.acquire(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_blocked_acquire_wakes_on_release() {
        let lock = Arc::new(ExclusionLock::new(0u32));
        let guard = lock.acquire();

        let waiter = {
            let lock = Arc::clone(&lock);
            std::thread::spawn(move || {
                let mut guard = lock.acquire();
                *guard += 1;
            })
        };

        // Give the waiter time to suspend, then release.
        std::thread::sleep(Duration::from_millis(50));
        drop(guard);

        waiter.join().unwrap();
        assert_eq!(*lock.acquire(), 1);
    }

    #[test]
    fn test_contended_increments_are_serialized() {
        let lock = Arc::new(ExclusionLock::new(0u64));
        let observed_torn = Arc::new(AtomicUsize::new(0));

        crossbeam::thread::scope(|s| {
            for _ in 0..4 {
                let lock = Arc::clone(&lock);
                let observed_torn = Arc::clone(&observed_torn);
                s.spawn(move |_| {
                    for _ in 0..1000 {
                        let mut guard = lock.acquire();
                        let before = *guard;
                        *guard = before + 1;
                        if *guard != before + 1 {
                            observed_torn.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        })
        .unwrap();

        assert_eq!(observed_torn.load(Ordering::Relaxed), 0);
        assert_eq!(*lock.acquire(), 4000);
    }
}
