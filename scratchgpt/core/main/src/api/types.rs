//! Core types for tensor operations

/// The only reduction axis tensors support: reduce across the columns of each row.
pub const ROW_AXIS: i32 = -1;

/// Value written over masked attention scores so softmax sends them to ~0.
pub const MASK_FILL: f64 = -1e9;

/// How the right-hand operand of an element-wise binary operation lines up
/// with the left-hand operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Broadcast {
    /// Identical shapes, element by element.
    Elementwise,
    /// Right operand is `rows x 1` and is repeated across every column.
    Column,
    /// Right operand is `1 x cols` and is repeated down every row.
    Row,
}

impl Broadcast {
    /// Resolve how `rhs` broadcasts against `lhs`.
    ///
    /// Identical shapes win over the vector forms, then a column vector is
    /// tried before a row vector. Returns `None` for any other combination.
    pub fn resolve(lhs: (usize, usize), rhs: (usize, usize)) -> Option<Self> {
        if lhs == rhs {
            Some(Broadcast::Elementwise)
        } else if rhs.0 == lhs.0 && rhs.1 == 1 {
            Some(Broadcast::Column)
        } else if rhs.0 == 1 && rhs.1 == lhs.1 {
            Some(Broadcast::Row)
        } else {
            None
        }
    }
}
