use crate::aircraft::Aircraft;
use crate::crew::{CabinCrew, Pilot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of anything the ledger can book onto a leg.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKey {
    Aircraft(Arc<str>),
    Pilot(Arc<str>),
    CabinCrew(Arc<str>),
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Aircraft(tail) => write!(f, "aircraft {}", tail),
            ResourceKey::Pilot(name) => write!(f, "pilot {}", name),
            ResourceKey::CabinCrew(name) => write!(f, "cabin crew {}", name),
        }
    }
}

pub trait Resource {
    fn key(&self) -> ResourceKey;
}

impl Resource for Aircraft {
    fn key(&self) -> ResourceKey {
        ResourceKey::Aircraft(self.tail_code.clone())
    }
}

impl Resource for Pilot {
    fn key(&self) -> ResourceKey {
        ResourceKey::Pilot(self.name.clone())
    }
}

impl Resource for CabinCrew {
    fn key(&self) -> ResourceKey {
        ResourceKey::CabinCrew(self.name.clone())
    }
}

impl<T: Resource + ?Sized> Resource for Arc<T> {
    fn key(&self) -> ResourceKey {
        (**self).key()
    }
}
