//! Write-once resolution slots
//!
//! A slot starts empty when the parser builds the tree and is filled exactly
//! once during analysis. Reading an empty slot yields `None`; a second write
//! is an internal fault.

use std::cell::OnceCell;
use std::fmt;

use crate::error::{DachsError, DachsResult};

#[derive(Clone, PartialEq)]
pub struct Slot<T>(OnceCell<T>);

impl<T> Slot<T> {
    /// An unresolved slot
    pub fn new() -> Self {
        Slot(OnceCell::new())
    }

    /// A slot that is already resolved, for trees built with known types
    pub fn resolved(value: T) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(value);
        Slot(cell)
    }

    pub fn get(&self) -> Option<&T> {
        self.0.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.0.get().is_some()
    }

    /// Record the resolved value
    ///
    /// # Errors
    ///
    /// Returns an internal error if the slot has already been written.
    pub fn fill(&self, value: T) -> DachsResult<()> {
        self.0
            .set(value)
            .map_err(|_| DachsError::internal_error("resolution slot written twice"))
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get() {
            Some(value) => write!(f, "Resolved({:?})", value),
            None => f.write_str("Unresolved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_empty() {
        let slot: Slot<i32> = Slot::new();
        assert!(!slot.is_resolved());
        assert_eq!(slot.get(), None);
        assert_eq!(format!("{:?}", slot), "Unresolved");
    }

    #[test]
    fn test_slot_is_write_once() {
        let slot = Slot::new();
        assert!(slot.fill(1).is_ok());
        assert_eq!(slot.get(), Some(&1));

        let err = slot.fill(2).unwrap_err();
        assert_eq!(err.kind(), "Internal Error");
        assert_eq!(slot.get(), Some(&1));
    }

    #[test]
    fn test_resolved_slot() {
        let slot = Slot::resolved("int");
        assert!(slot.is_resolved());
        assert!(slot.fill("bool").is_err());
    }
}
