//! Fixed-capacity FIFO shared between intake producers and the scheduler.
//!
//! All ring-buffer fields live behind one mutex, and a single condition
//! variable signals "not empty". Enqueue never blocks; `dequeue` parks the
//! caller until a value arrives or the queue is closed.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::simulation_engine::vehicles::Vehicle;

pub type VehicleQueue = BoundedQueue<Vehicle>;

/// Why an `enqueue` was refused. The rejected value is handed back.
#[derive(Debug, PartialEq, Eq)]
pub enum EnqueueError<T> {
    Full(T),
    Closed(T),
}

impl<T> EnqueueError<T> {
    pub fn into_inner(self) -> T {
        match self {
            EnqueueError::Full(value) | EnqueueError::Closed(value) => value,
        }
    }
}

#[derive(Debug)]
struct Ring<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    count: usize,
    closed: bool,
}

impl<T> Ring<T> {
    fn push(&mut self, value: T) {
        let capacity = self.slots.len();
        self.slots[self.tail] = Some(value);
        self.tail = (self.tail + 1) % capacity;
        self.count += 1;
    }

    fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.slots.len();
        let value = self.slots[self.head].take();
        self.head = (self.head + 1) % capacity;
        self.count -= 1;
        value
    }
}

#[derive(Debug)]
pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,
    not_empty: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue. A zero capacity is bumped to one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let slots = std::iter::repeat_with(|| None).take(capacity).collect();
        Self {
            ring: Mutex::new(Ring {
                slots,
                head: 0,
                tail: 0,
                count: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    // Every mutation finishes inside one critical section, so a panic in
    // another holder cannot leave the ring half-updated.
    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends at the tail without blocking and wakes one waiting consumer.
    pub fn enqueue(&self, value: T) -> Result<(), EnqueueError<T>> {
        let mut ring = self.lock();
        if ring.closed {
            return Err(EnqueueError::Closed(value));
        }
        if ring.count == ring.slots.len() {
            return Err(EnqueueError::Full(value));
        }
        ring.push(value);
        drop(ring);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Removes the head, waiting for as long as the queue is empty.
    ///
    /// Returns `None` only once the queue has been closed and drained.
    pub fn dequeue(&self) -> Option<T> {
        let mut ring = self.lock();
        while ring.count == 0 && !ring.closed {
            ring = self
                .not_empty
                .wait(ring)
                .unwrap_or_else(PoisonError::into_inner);
        }
        ring.pop()
    }

    /// Like `dequeue`, but gives up after `timeout`.
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut ring = self.lock();
        while ring.count == 0 && !ring.closed {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(ring, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            ring = guard;
        }
        ring.pop()
    }

    /// Checks for a value and removes it in the same critical section.
    pub fn try_dequeue(&self) -> Option<T> {
        self.lock().pop()
    }

    /// Refuses further enqueues and wakes every blocked consumer.
    pub fn close(&self) {
        self.lock().closed = true;
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        let ring = self.lock();
        ring.count == ring.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.lock().slots.len()
    }
}
