/// Indicates a failure of a [`BalancedTree`](crate::BalancedTree) operation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    /// The tree has no entry with the given key.
    #[cfg_attr(feature = "std", error("no entry found for the key"))]
    NotFound,
    /// The tree already has an entry with the given key.
    #[cfg_attr(feature = "std", error("an entry with the same key already exists"))]
    DuplicateKey,
}
