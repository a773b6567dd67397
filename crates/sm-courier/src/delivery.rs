//! Delivery requests and the role a point of interest plays in them.

use sm_core::IntersectionId;

/// One package: collect it at `pickup`, leave it at `drop_off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delivery {
    pub pickup: IntersectionId,
    pub drop_off: IntersectionId,
}

impl Delivery {
    pub fn new(pickup: IntersectionId, drop_off: IntersectionId) -> Self {
        Self { pickup, drop_off }
    }
}

/// What a subpath leads to.
///
/// An intersection used in several roles is tagged with the first of
/// pickup, drop-off, depot that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKind {
    Pickup,
    DropOff,
    Depot,
}

/// Per-delivery progress through a tour.
///
/// Visiting an intersection picks up every package waiting there and then
/// drops off every package carried to it.
#[derive(Debug, Clone)]
pub(crate) struct Progress<'d> {
    deliveries: &'d [Delivery],
    picked: Vec<bool>,
    dropped: Vec<bool>,
}

impl<'d> Progress<'d> {
    pub(crate) fn new(deliveries: &'d [Delivery]) -> Self {
        Self {
            deliveries,
            picked: vec![false; deliveries.len()],
            dropped: vec![false; deliveries.len()],
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.dropped.iter().all(|&d| d)
    }

    /// Would visiting `stop` now achieve anything?
    ///
    /// True for a pending pickup, or for a drop-off point with an
    /// undelivered package once every package bound for it is on board.
    pub(crate) fn wants(&self, stop: IntersectionId) -> bool {
        let mut pending_drop = false;
        let mut all_on_board = true;
        for (i, d) in self.deliveries.iter().enumerate() {
            if d.pickup == stop && !self.picked[i] {
                return true;
            }
            if d.drop_off == stop {
                pending_drop |= !self.dropped[i];
                all_on_board &= self.picked[i];
            }
        }
        pending_drop && all_on_board
    }

    pub(crate) fn visit(&mut self, stop: IntersectionId) {
        for (i, d) in self.deliveries.iter().enumerate() {
            if d.pickup == stop {
                self.picked[i] = true;
            }
        }
        for (i, d) in self.deliveries.iter().enumerate() {
            if d.drop_off == stop && self.picked[i] {
                self.dropped[i] = true;
            }
        }
    }
}
