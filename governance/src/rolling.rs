//! Fixed-length circular vote buffer.
//!
//! Writing to a slot overwrites whatever it held, so the oldest vote
//! silently expires once the cursor wraps. A value's count is the number of
//! slots currently holding it.

/// A fixed array of optional slots with a round-robin write cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollingBuffer<T> {
    slots: Box<[Option<T>]>,
    cursor: usize,
}

impl<T: Copy + PartialEq> RollingBuffer<T> {
    /// A buffer of `len` empty slots. `len` must be positive.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len.max(1)].into_boxed_slice(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Slot the next [`push`](Self::push) writes to.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Write `value` at the cursor and advance it. Returns the slot written.
    pub fn push(&mut self, value: T) -> usize {
        let slot = self.cursor;
        self.slots[slot] = Some(value);
        self.cursor = (self.cursor + 1) % self.slots.len();
        slot
    }

    /// Like [`push`](Self::push), but skips ahead to the first empty slot
    /// at or after the cursor. Overwrites the cursor slot only when the
    /// buffer is full.
    pub fn push_vacant(&mut self, value: T) -> usize {
        let len = self.slots.len();
        if let Some(offset) = (0..len).find(|i| self.slots[(self.cursor + i) % len].is_none()) {
            self.cursor = (self.cursor + offset) % len;
        }
        self.push(value)
    }

    /// Overwrite a specific slot without moving the cursor.
    pub fn set(&mut self, slot: usize, value: Option<T>) {
        let len = self.slots.len();
        self.slots[slot % len] = value;
    }

    pub fn get(&self, slot: usize) -> Option<T> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn count(&self, value: &T) -> usize {
        self.slots.iter().filter(|s| s.as_ref() == Some(value)).count()
    }

    /// Empty every slot holding `value`.
    pub fn remove_all(&mut self, value: &T) {
        for slot in self.slots.iter_mut() {
            if slot.as_ref() == Some(value) {
                *slot = None;
            }
        }
    }

    /// Empty every slot and rewind the cursor.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.cursor = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.slots.iter().copied()
    }
}
