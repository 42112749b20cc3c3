use thiserror::Error;

/// Errors reported by fallible tree construction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested order cannot form a valid tree: an order below 3 would
    /// demand a non-root minimum of zero keys, so splits and merges could
    /// never terminate.
    #[error("invalid order {0}, a B-tree requires order >= 3")]
    InvalidOrder(usize),
}
