//! Retirement queue: in-order commit over out-of-order-completing units.
//!
//! A bounded FIFO of sequence numbers, appended at dispatch. A functional
//! unit may hand its instruction to writeback only when that instruction's
//! sequence number is at the head; the head is popped only at successful
//! writeback. Entries therefore appear, and leave, in dispatch order.

use std::collections::VecDeque;

use crate::common::Fault;

/// FIFO of in-flight instruction sequence numbers.
#[derive(Clone, Debug)]
pub struct RetireQueue {
    entries: VecDeque<u32>,
    capacity: usize,
}

impl RetireQueue {
    /// Creates an empty queue with the given capacity bound.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a dispatched instruction's sequence number.
    pub fn push(&mut self, seq: u32) -> Result<(), Fault> {
        if self.entries.len() == self.capacity {
            return Err(Fault::RetireQueueOverflow { seq });
        }
        self.entries.push_back(seq);
        Ok(())
    }

    /// The sequence number next in line to commit, if any.
    #[inline]
    pub fn head(&self) -> Option<u32> {
        self.entries.front().copied()
    }

    /// Whether `seq` is at the head and may proceed to writeback.
    #[inline]
    pub fn at_head(&self, seq: u32) -> bool {
        self.head() == Some(seq)
    }

    /// Pops the head at retirement of `seq`. Raises an internal fault if
    /// the queue is empty or `seq` is not the head — either means the
    /// queue-gating discipline was broken upstream.
    pub fn pop(&mut self, seq: u32) -> Result<(), Fault> {
        match self.entries.front().copied() {
            None => Err(Fault::RetireQueueUnderflow { seq }),
            Some(head) if head != seq => Err(Fault::CommitOutOfOrder { head, seq }),
            Some(_) => {
                let _ = self.entries.pop_front();
                Ok(())
            }
        }
    }

    /// Number of dispatched-but-not-retired instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no instructions are in flight.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue contents in dispatch order, oldest first. For trace display.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().copied()
    }
}
