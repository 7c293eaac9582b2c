//! Owned registry of carousel instances keyed by container identifier.

use crate::controller::CarouselInstance;
use crate::ContainerId;
use std::collections::HashMap;

/// Maps container identifiers to their live instance.
///
/// Inserting under an existing identifier replaces the record; there is never
/// more than one instance per container.
#[derive(Debug, Default)]
pub struct CarouselRegistry {
    instances: HashMap<ContainerId, CarouselInstance>,
    next_suffix: u64,
}

impl CarouselRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `instance`, returning the record it superseded.
    pub fn insert(&mut self, instance: CarouselInstance) -> Option<CarouselInstance> {
        self.instances.insert(instance.id.clone(), instance)
    }

    pub fn get(&self, id: &ContainerId) -> Option<&CarouselInstance> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &ContainerId) -> Option<&mut CarouselInstance> {
        self.instances.get_mut(id)
    }

    pub fn remove(&mut self, id: &ContainerId) -> Option<CarouselInstance> {
        self.instances.remove(id)
    }

    pub fn contains(&self, id: &ContainerId) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> Vec<ContainerId> {
        let mut ids: Vec<ContainerId> = self.instances.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Produce an identifier of the form `carousel-<suffix>` not yet registered.
    pub fn generate_id(&mut self) -> ContainerId {
        loop {
            self.next_suffix += 1;
            let candidate = ContainerId::new(format!("carousel-{:x}", self.next_suffix));
            if !self.instances.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}
