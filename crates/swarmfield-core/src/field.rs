//! Field: the shared medium agents write to and are pushed by.
//!
//! Agents never talk to each other directly. They deposit chemical into
//! the field and feel the field's gradient force, so influence travels
//! through the medium with a delay.

use crate::types::*;

/// The operations an agent may perform on the shared field during its update.
///
/// Both calls take world coordinates. Coordinates that map outside the
/// grid are not an error: a deposit there is dropped and a sample there
/// reads as zero force.
pub trait ChemicalField {
    /// Add `amount` of chemical to the cell containing `position`.
    fn deposit(&mut self, position: Position, amount: f64);

    /// Gradient force stored for the cell containing `position`.
    fn sample_force(&self, position: Position) -> Vec2;
}
