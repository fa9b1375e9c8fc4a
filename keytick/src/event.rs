//! Event sinks.
//!
//! The key state machine hands every classified event to an [`EventSink`]. What happens
//! next, queuing, delivery or dropping, belongs to the sink.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use heapless::Deque;
pub use keytick_types::event::{EventCode, KeyEvent, KeyEventKind};
use keytick_types::key_mask::KeyMask;

/// Receiver of classified key events, in the order they are produced.
pub trait EventSink {
    /// Accept one event. Must not block.
    fn push(&mut self, event: KeyEvent);

    /// Drop every event that has not been consumed yet
    fn flush(&mut self) {}
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn push(&mut self, event: KeyEvent) {
        (**self).push(event)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

/// Bounded FIFO queue. Events pushed while the queue is full are dropped.
impl<const N: usize> EventSink for Deque<KeyEvent, N> {
    fn push(&mut self, event: KeyEvent) {
        if let Err(event) = self.push_back(event) {
            warn!("Event queue full, dropping {:?}", event);
        }
    }

    fn flush(&mut self) {
        self.clear();
    }
}

/// Channel shared with an async consumer. Events are sent without waiting.
impl<M: RawMutex, const N: usize> EventSink for &Channel<M, KeyEvent, N> {
    fn push(&mut self, event: KeyEvent) {
        if let Err(TrySendError::Full(event)) = self.try_send(event) {
            warn!("Event channel full, dropping {:?}", event);
        }
    }

    fn flush(&mut self) {
        self.clear();
    }
}

/// Holder of the last produced event.
///
/// Each push replaces the previous event. Events of trim keys and of all other keys are
/// read by different consumers, so [`EventSlot::take`] only hands out an event of the
/// requested group.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventSlot {
    event: Option<KeyEvent>,
    trim_keys: KeyMask,
}

impl EventSlot {
    pub const fn new(trim_keys: KeyMask) -> Self {
        Self {
            event: None,
            trim_keys,
        }
    }

    /// Take the pending event if it belongs to the trim group (`trim = true`) or to the
    /// other keys (`trim = false`). A pending event of the other group stays in the slot.
    pub fn take(&mut self, trim: bool) -> Option<KeyEvent> {
        let event = self.event?;
        if self.is_trim(&event) == trim {
            self.event.take()
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<KeyEvent> {
        self.event
    }

    pub fn is_trim(&self, event: &KeyEvent) -> bool {
        self.trim_keys.contains(event.key as usize)
    }
}

impl EventSink for EventSlot {
    fn push(&mut self, event: KeyEvent) {
        self.event = Some(event);
    }

    fn flush(&mut self) {
        self.event = None;
    }
}

#[cfg(test)]
mod tests {
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;

    #[test]
    fn test_slot_keeps_last_event() {
        let mut slot = EventSlot::default();
        slot.push(KeyEvent::new(KeyEventKind::First, 1));
        slot.push(KeyEvent::new(KeyEventKind::Break, 2));
        assert_eq!(slot.take(false), Some(KeyEvent::new(KeyEventKind::Break, 2)));
        assert_eq!(slot.take(false), None);
    }

    #[test]
    fn test_slot_filters_trim_events() {
        let mut slot = EventSlot::new(KeyMask::from_keys(&[6, 7]));
        slot.push(KeyEvent::new(KeyEventKind::Repeat, 7));
        assert_eq!(slot.take(false), None);
        assert_eq!(slot.take(true), Some(KeyEvent::new(KeyEventKind::Repeat, 7)));

        slot.push(KeyEvent::new(KeyEventKind::First, 0));
        assert_eq!(slot.take(true), None);
        assert_eq!(slot.peek(), Some(KeyEvent::new(KeyEventKind::First, 0)));
        slot.flush();
        assert_eq!(slot.take(false), None);
    }

    #[test]
    fn test_deque_drops_when_full() {
        let mut queue: Deque<KeyEvent, 2> = Deque::new();
        for key in 0..3 {
            queue.push(KeyEvent::new(KeyEventKind::First, key));
        }
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front(), Some(KeyEvent::new(KeyEventKind::First, 0)));
        assert_eq!(queue.pop_front(), Some(KeyEvent::new(KeyEventKind::First, 1)));
        queue.push(KeyEvent::new(KeyEventKind::Long, 4));
        EventSink::flush(&mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_channel_sink() {
        let channel: Channel<NoopRawMutex, KeyEvent, 4> = Channel::new();
        let mut sink = &channel;
        sink.push(KeyEvent::new(KeyEventKind::First, 0));
        sink.push(KeyEvent::new(KeyEventKind::Break, 0));
        assert_eq!(channel.try_receive(), Ok(KeyEvent::new(KeyEventKind::First, 0)));
        sink.flush();
        assert!(channel.try_receive().is_err());
    }
}
