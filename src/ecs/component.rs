use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Trait that all components must implement
///
/// Components are plain data. The name is used for logging and for
/// `ComponentKind`'s display form.
pub trait Component: Any {
    const NAME: &'static str;

    /// Get the kind identifier for this component type
    fn kind() -> ComponentKind
    where
        Self: Sized,
    {
        ComponentKind::of::<Self>()
    }
}

/// Identifies a component type inside an entity and in system requirement sets
#[derive(Clone, Copy)]
pub struct ComponentKind {
    id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    pub fn of<C: Component>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ComponentKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentKind {}

impl Hash for ComponentKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
