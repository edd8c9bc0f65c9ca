use std::collections::HashMap;

use super::blockstate::BlockState;

/// The block-state cache for a region.
///
/// Every distinct [BlockState] that shows up while decoding a region's
/// palettes gets a unique id the first time it is seen. Ids are handed
/// out in insertion order starting at 0, states are never removed, and
/// an id never changes once assigned. Section data arrays store these
/// ids instead of repeating the states themselves.
#[derive(Debug)]
pub struct BlockRegistry {
	ids: HashMap<BlockState, u32>,
	states: Vec<BlockState>,
}

impl BlockRegistry {
	pub fn new() -> Self {
		Self {
			ids: HashMap::new(),
			states: Vec::new(),
		}
	}

	/// Creates a block registry with "minecraft:air" registered in
	/// the first slot (index/id 0).
	pub fn with_air() -> Self {
		let mut registry = Self::new();
		registry.register(BlockState::air());
		registry
	}

	/// Registers a [BlockState] with the registry and returns its id.
	/// The id of a state that is already registered is returned
	/// unchanged, so registering is also how you look up.
	pub fn register(&mut self, state: BlockState) -> u32 {
		if let Some(&id) = self.ids.get(&state) {
			return id;
		}
		let id = self.states.len() as u32;
		self.ids.insert(state.clone(), id);
		self.states.push(state);
		id
	}

	/// Gets a [BlockState] from the registry by id.
	pub fn get(&self, id: u32) -> Option<&BlockState> {
		self.states.get(id as usize)
	}

	pub fn contains(&self, state: &BlockState) -> bool {
		self.ids.contains_key(state)
	}

	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<BlockState> {
		self.states.iter()
	}
}

impl Default for BlockRegistry {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::blockstate;

	#[test]
	fn ids_are_zero_based_and_stable() {
		let mut registry = BlockRegistry::new();
		assert_eq!(registry.register(blockstate!(air)), 0);
		assert_eq!(registry.register(blockstate!(stone)), 1);
		// Registering again returns the id assigned the first time.
		assert_eq!(registry.register(blockstate!(air)), 0);
		assert_eq!(registry.register(blockstate!(stone)), 1);
		assert_eq!(registry.len(), 2);
		assert_eq!(registry.get(1).unwrap(), &blockstate!(stone));
		assert_eq!(registry.get(2), None);
	}

	#[test]
	fn distinct_properties_are_distinct_states() {
		let mut registry = BlockRegistry::new();
		let a = registry.register(blockstate!(oak_door[half="upper"]));
		let b = registry.register(blockstate!(oak_door[half="lower"]));
		assert_ne!(a, b);
	}
}
