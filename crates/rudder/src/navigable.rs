use crate::location::Location;

/// The widened message type of a wrapped program.
///
/// [`to_navigable`](crate::to_navigable) specializes a program's message
/// type to `Navigable<Msg>`: location-change notifications arrive as
/// [`Change`](Navigable::Change), everything the user's program already
/// understood arrives as [`User`](Navigable::User).  Matching is exhaustive
/// everywhere the wrapper consumes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigable<Msg> {
    /// The effective browser location changed.
    Change(Location),
    /// A message belonging to the wrapped program.
    User(Msg),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_compare() {
        let a: Navigable<i32> = Navigable::Change(Location::from_href("/a"));
        let b: Navigable<i32> = Navigable::User(1);
        assert_ne!(a, b);
        assert_eq!(a, Navigable::Change(Location::from_href("/a")));
    }
}
