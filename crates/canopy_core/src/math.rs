//! Integer math helpers
//!
//! Re-exports glam with the grid-specific helpers the engine needs

pub use glam::*;

/// Returns true when `v` is the zero vector (an unset area or offset).
#[inline]
pub fn is_zero(v: IVec2) -> bool {
    v == IVec2::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_detection() {
        assert!(is_zero(IVec2::ZERO));
        assert!(!is_zero(IVec2::new(0, 1)));
    }
}
