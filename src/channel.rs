//! Interrupt-safe bounded queue.
//!
//! Edge notifications arrive from GPIO interrupt context and effect
//! commands from gesture handlers; both cross into the controller through
//! this queue. The queue is the only state shared between contexts and is
//! guarded by a single critical section.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::error::Error;

/// A bounded FIFO shared between producers and one draining consumer.
pub struct Channel<T, const SIZE: usize> {
    queue: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Producer handle. Any number may exist at once.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    /// Consumer handle, normally held by the controller.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Enqueue `value`, handing it back if the queue is full.
    pub fn try_send(&self, value: T) -> Result<(), T> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().push_back(value))
    }

    /// Dequeue the oldest value, if any.
    pub fn try_receive(&self) -> Option<T> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of a [`Channel`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Enqueue `value`, failing with [`Error::ChannelFull`] when there is no room.
    pub fn try_send(&self, value: T) -> Result<(), Error> {
        self.channel.try_send(value).map_err(|_| Error::ChannelFull)
    }
}

/// Consumer side of a [`Channel`].
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<'a, T, const SIZE: usize> Receiver<'a, T, SIZE> {
    pub fn try_receive(&self) -> Option<T> {
        self.channel.try_receive()
    }

    /// Iterate over everything queued right now, in arrival order.
    ///
    /// Values sent while the iterator is alive are also yielded.
    pub fn drain(&self) -> Drain<'a, T, SIZE> {
        Drain {
            channel: self.channel,
        }
    }
}

/// Iterator returned by [`Receiver::drain`].
pub struct Drain<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Iterator for Drain<'_, T, SIZE> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.channel.try_receive()
    }
}
