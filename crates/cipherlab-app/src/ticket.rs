//! Call correlation.

use std::fmt;

/// Identifier attached to one outgoing API call.
///
/// Strictly increasing within an [`crate::App`]; a view remembers the ticket
/// it is waiting for and ignores replies carrying any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ticket source.
#[derive(Debug, Clone, Default)]
pub struct Tickets {
    last: u64,
}

impl Tickets {
    /// Fresh source; the first ticket is `#1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ticket.
    pub fn issue(&mut self) -> Ticket {
        self.last += 1;
        Ticket(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_increasing() {
        let mut tickets = Tickets::new();
        let a = tickets.issue();
        let b = tickets.issue();
        assert!(b > a);
        assert_eq!(a.get(), 1);
        assert_eq!(b.to_string(), "#2");
    }
}
