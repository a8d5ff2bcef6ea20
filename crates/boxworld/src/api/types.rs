use std::fmt;

/// Unique identifier for an entity in the world.
/// Assigned on registration, starting at 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity token for a component type.
/// An entity holds at most one component per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKey(pub &'static str);

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Edge of a target hitbox struck by a moving hitbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

impl Edge {
    /// Tie-break order used when a swept path crosses more than one edge.
    pub const PRIORITY: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];
}
