//! Request lifecycle tracking for the session's network-backed transitions.

/// Identifies one issued request. Tags are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTag(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestSlot {
    #[default]
    Idle,
    InFlight(RequestTag),
}

impl RequestSlot {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::InFlight(_))
    }

    pub fn start(&mut self, tag: RequestTag) {
        *self = Self::InFlight(tag);
    }

    /// Returns the slot to `Idle` if `tag` is the request currently in flight.
    /// A mismatched tag leaves the slot untouched and reports `false`.
    pub fn resolve(&mut self, tag: RequestTag) -> bool {
        match self {
            Self::InFlight(current) if *current == tag => {
                *self = Self::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

#[derive(Debug, Default)]
pub(crate) struct TagIssuer {
    last: u64,
}

impl TagIssuer {
    pub(crate) fn next(&mut self) -> RequestTag {
        self.last += 1;
        RequestTag(self.last)
    }
}
