/// Ticket handed out when a request starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonically increasing request generation for one kind of operation.
///
/// Every new request takes a fresh [`Ticket`]; a completion is only applied if
/// its ticket is still the latest one, so a slow stale response can never
/// overwrite the result of a newer request.
#[derive(Debug, Default, Clone)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.current = self.current.wrapping_add(1);
        Ticket(self.current)
    }

    /// Invalidates every outstanding ticket without starting a new request.
    pub fn invalidate(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::Generation;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut g = Generation::new();
        let a = g.issue();
        let b = g.issue();
        assert!(!g.is_current(a));
        assert!(g.is_current(b));
        assert!(b > a);
    }

    #[test]
    fn invalidate_retires_outstanding_tickets() {
        let mut g = Generation::new();
        let a = g.issue();
        g.invalidate();
        assert!(!g.is_current(a));
        let b = g.issue();
        assert!(g.is_current(b));
    }
}
