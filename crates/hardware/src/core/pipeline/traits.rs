//! Pipeline Latch Interface.
//!
//! Common operations on inter-stage buffers: squashing and occupancy checks.
//! The fetch skid buffer and every stage register implement this.

/// Represents a pipeline latch (inter-stage buffer).
pub trait PipelineLatch {
    /// Clears all entries in the latch.
    ///
    /// Called on redirects to squash younger instructions.
    fn flush(&mut self);

    /// Checks if the latch is empty.
    ///
    /// # Returns
    ///
    /// `true` if there are no valid instructions in the latch, `false` otherwise.
    fn is_empty(&self) -> bool;
}
