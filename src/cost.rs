/// Accumulated path cost.
///
/// Costs are unsigned and saturate instead of overflowing, so `max_value()`
/// can be used as an "unreachable" marker.
pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + num_traits::SaturatingAdd
    + num_traits::bounds::UpperBounded
    + num_traits::Zero
    + num_traits::One
    + num_traits::Unsigned
    + std::ops::Add<Self, Output = Self>
    + std::ops::AddAssign
{
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != num_traits::bounds::UpperBounded::max_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_value_is_not_a_valid_cost() {
        assert!(0u32.valid());
        assert!(41u32.valid());
        assert!(!u32::MAX.valid());
    }
}
