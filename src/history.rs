use log::debug;

/// How many machine states the interpreter keeps for rewinding.
pub const HISTORY_CAPACITY: usize = 1000;

/// Fixed-capacity ring of states.
///
/// `head` is the newest state ever executed; `current` is the one on show,
/// which trails `head` while rewinding. Committing a state when the ring is
/// full silently overwrites the oldest one.
#[derive(Debug)]
pub struct History<T> {
    slots: Box<[T]>,
    head: usize,
    current: usize,
    total_cycles: u64,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_capacity(HISTORY_CAPACITY, initial)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize, initial: T) -> Self {
        assert!(capacity > 0, "history needs at least one slot");
        Self {
            slots: vec![initial; capacity].into_boxed_slice(),
            head: 0,
            current: 0,
            total_cycles: 0,
        }
    }

    /// Discards everything and starts over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.head = 0;
        self.current = 0;
        self.total_cycles = 0;
        self.slots[0] = initial;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn current(&self) -> &T {
        &self.slots[self.current]
    }

    /// The state on show, modified in place (timers tick this way).
    pub fn current_mut(&mut self) -> &mut T {
        &mut self.slots[self.current]
    }

    pub fn head(&self) -> &T {
        &self.slots[self.head]
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn is_replaying(&self) -> bool {
        self.current != self.head
    }

    /// How many steps `current` trails `head`.
    pub fn behind(&self) -> usize {
        (self.head + self.capacity() - self.current) % self.capacity()
    }

    /// How far back from `head` the oldest retained state sits.
    pub fn depth(&self) -> usize {
        let retained = (self.capacity() - 1) as u64;
        self.total_cycles.min(retained) as usize
    }

    /// Records `state` as the new head and shows it.
    pub fn commit(&mut self, state: T) {
        self.head = self.next(self.head);
        self.slots[self.head] = state;
        self.current = self.head;
        self.total_cycles += 1;
    }

    /// Moves `current` one step towards `head`. Returns false at the head.
    pub fn step_forward(&mut self) -> bool {
        if !self.is_replaying() {
            return false;
        }
        self.current = self.next(self.current);
        debug!("Replayed one state [behind: {}]", self.behind());
        true
    }

    /// Moves `current` one step back. Refused at the oldest retained state.
    pub fn step_back(&mut self) -> bool {
        if self.behind() >= self.depth() {
            debug!("Rewind refused at oldest state [depth: {}]", self.depth());
            return false;
        }
        self.current = self.prev(self.current);
        debug!("Rewound one state [behind: {}]", self.behind());
        true
    }

    fn next(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }

    fn prev(&self, index: usize) -> usize {
        (index + self.capacity() - 1) % self.capacity()
    }
}
