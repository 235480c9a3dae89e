//! Lock-free MPMC ring buffer with sequenced slots.
//!
//! Dmitry Vyukov's bounded MPMC queue: a fixed power-of-two array of
//! slots, each carrying a monotonically advancing "turn" counter, plus
//! two cache-line-isolated cursors. Producers claim tickets from the
//! enqueue cursor, consumers from the dequeue cursor; the per-slot turn
//! decides whose move it is.
//!
//! ## Slot-state protocol
//!
//! For a ticket `t` and the slot at index `t & mask`:
//!
//! | turn value | meaning |
//! |------------|---------|
//! | `t` | empty, claimable by the producer holding ticket `t` |
//! | `t + 1` | published, readable by the consumer holding ticket `t` |
//! | `t + capacity` | drained, claimable by the next-lap producer |
//!
//! Any other value means another party is ahead: reload the cursor and
//! retry, or report full/empty.
//!
//! ## Memory ordering
//!
//! The synchronization edges live on the per-slot turns, not the cursors:
//! turn loads are acquire, turn stores after a payload access are release,
//! and the cursors run entirely relaxed. The claiming CAS is the weak
//! variant inside a retry loop. Turns and tickets are unsigned and wrap;
//! all comparisons go through a signed 64-bit difference so the ordering
//! relation survives the wrap.

use std::cell::UnsafeCell;
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::error::{Result, SpanqError};
use crate::queue::{Queue, QueueEntry};

/// One ring element: the turn counter that gates publication and the
/// payload cell it protects. No padding; the turn transitions alone
/// guarantee exclusive access to the cell.
struct Slot<T> {
    turn: AtomicU64,
    value: UnsafeCell<T>,
}

/// Lock-free bounded MPMC queue over trivially copyable payloads.
///
/// `try_enqueue`/`try_dequeue` never block and make no allocations or
/// system calls. Observed full/empty are transient; callers retry at
/// their own pace, typically with [`crate::cpu_relax`] between attempts.
pub struct RingBuffer<T: QueueEntry> {
    /// Next ticket a producer will attempt to claim. Written only by
    /// producers; isolated so consumer traffic never invalidates it.
    head: CachePadded<AtomicU64>,
    /// Next ticket a consumer will attempt to claim. Written only by
    /// consumers, on its own cache line.
    tail: CachePadded<AtomicU64>,
    slots: Box<[Slot<T>]>,
    mask: usize,
}

// The turn protocol hands each slot to exactly one thread between the
// claiming CAS and the releasing turn store, so shared access is sound
// for any Send payload.
unsafe impl<T: QueueEntry> Send for RingBuffer<T> {}
unsafe impl<T: QueueEntry> Sync for RingBuffer<T> {}

impl<T: QueueEntry> RingBuffer<T> {
    /// Create a ring with the given capacity.
    ///
    /// The capacity must be a power of two greater than zero; anything
    /// else is rejected here, the only fatal error in the component.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SpanqError::config("Capacity must be greater than 0"));
        }
        if !capacity.is_power_of_two() {
            return Err(SpanqError::config("Capacity must be a power of 2"));
        }

        // Slot i starts at turn i: the first lap's producer tickets map
        // straight onto the slots.
        let slots = (0..capacity)
            .map(|i| Slot {
                turn: AtomicU64::new(i as u64),
                value: UnsafeCell::new(T::default()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
            slots,
            mask: capacity - 1,
        })
    }

    /// Ring whose cursors start at `ticket` instead of zero. Lets tests
    /// drive the unsigned cursors across their wraparound boundary
    /// without performing 2^64 operations first.
    #[cfg(test)]
    fn with_start_ticket(capacity: usize, ticket: u64) -> Result<Self> {
        let ring = Self::with_capacity(capacity)?;
        for offset in 0..capacity as u64 {
            let t = ticket.wrapping_add(offset);
            ring.slots[(t as usize) & ring.mask]
                .turn
                .store(t, Ordering::Relaxed);
        }
        ring.head.store(ticket, Ordering::Relaxed);
        ring.tail.store(ticket, Ordering::Relaxed);
        Ok(ring)
    }

    /// The fixed capacity.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Snapshot of the number of queued payloads. Advisory only: under
    /// concurrent traffic the value may be stale by the time it returns.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        let diff = head.wrapping_sub(tail) as i64;
        diff.clamp(0, self.slots.len() as i64) as usize
    }

    /// Snapshot emptiness check. Advisory, like [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `value` into the next free slot. Returns `false` when the
    /// ring is observed full. Never blocks.
    pub fn try_enqueue(&self, value: T) -> bool {
        let mut ticket = self.head.load(Ordering::Relaxed);
        loop {
            // Mask keeps the index in range.
            let slot = unsafe { self.slots.get_unchecked((ticket as usize) & self.mask) };
            let turn = slot.turn.load(Ordering::Acquire);
            let diff = turn.wrapping_sub(ticket) as i64;

            if diff == 0 {
                // Our turn. Winning the CAS grants exclusive ownership of
                // the slot until the release store below.
                match self.head.compare_exchange_weak(
                    ticket,
                    ticket.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        unsafe { ptr::write(slot.value.get(), value) };
                        slot.turn.store(ticket.wrapping_add(1), Ordering::Release);
                        return true;
                    }
                    // Spurious failure and a lost race look the same:
                    // retry with the cursor value the CAS reported.
                    Err(current) => ticket = current,
                }
            } else if diff < 0 {
                // Slot not yet drained from the previous lap: full.
                return false;
            } else {
                // Another producer already claimed this ticket.
                ticket = self.head.load(Ordering::Relaxed);
            }
        }
    }

    /// Copy the next published payload into `out`. Returns `false` when
    /// the ring is observed empty, leaving `out` unmodified. Never
    /// blocks.
    pub fn try_dequeue(&self, out: &mut T) -> bool {
        let mut ticket = self.tail.load(Ordering::Relaxed);
        loop {
            let slot = unsafe { self.slots.get_unchecked((ticket as usize) & self.mask) };
            let turn = slot.turn.load(Ordering::Acquire);
            let diff = turn.wrapping_sub(ticket.wrapping_add(1)) as i64;

            if diff == 0 {
                match self.tail.compare_exchange_weak(
                    ticket,
                    ticket.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        *out = unsafe { ptr::read(slot.value.get()) };
                        // Hand the slot to the next-lap producer.
                        slot.turn.store(
                            ticket.wrapping_add(self.slots.len() as u64),
                            Ordering::Release,
                        );
                        return true;
                    }
                    Err(current) => ticket = current,
                }
            } else if diff < 0 {
                // Producer for this ticket has not published yet: empty.
                return false;
            } else {
                // Another consumer already claimed this ticket.
                ticket = self.tail.load(Ordering::Relaxed);
            }
        }
    }
}

impl<T: QueueEntry> Queue<T> for RingBuffer<T> {
    #[inline(always)]
    fn try_enqueue(&self, value: T) -> bool {
        RingBuffer::try_enqueue(self, value)
    }

    #[inline(always)]
    fn try_dequeue(&self, out: &mut T) -> bool {
        RingBuffer::try_dequeue(self, out)
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        RingBuffer::capacity(self)
    }
}
