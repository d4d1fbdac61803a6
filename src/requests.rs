//! Generation tickets for in-flight requests.
//!
//! Each user action takes a ticket for its slot before the request goes out.
//! A later action in the same slot supersedes it, and the earlier completion is
//! dropped instead of overwriting newer output.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSlot {
    Predict,
    Dashboard,
    Models,
}

impl RequestSlot {
    fn index(self) -> usize {
        match self {
            RequestSlot::Predict => 0,
            RequestSlot::Dashboard => 1,
            RequestSlot::Models => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: RequestSlot,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    generations: [u64; 3],
}

impl RequestTracker {
    pub fn new() -> Self {
        RequestTracker::default()
    }

    pub fn begin(&mut self, slot: RequestSlot) -> Ticket {
        let generation = &mut self.generations[slot.index()];
        *generation += 1;
        Ticket { slot, generation: *generation }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generations[ticket.slot.index()] == ticket.generation
    }

    /// Supersede whatever is in flight for `slot` without starting anything new.
    pub fn cancel(&mut self, slot: RequestSlot) {
        self.generations[slot.index()] += 1;
    }
}
