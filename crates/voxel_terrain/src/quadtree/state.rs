//! Derived node states and per-update statistics.

/// Where a node is in its split/merge lifecycle, derived from the leaf
/// predicate, its children and chunk residency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
	/// Leaf without children; its own chunk is (or will be) shown.
	LeafResident,
	/// Wants finer detail but has no children yet. Splits once its
	/// siblings are resident.
	NeedsSplit,
	/// Has children that are not all resident; its own chunk stays visible as
	/// a coarse fallback.
	AwaitingChildren,
	/// All children resident; its own chunk is hidden but kept.
	MergedToChildren,
	/// Became a leaf while subdivided but its own chunk is not resident yet;
	/// children keep rendering meanwhile.
	AwaitingCollapse,
	/// Became a leaf while subdivided and its own chunk is resident; children
	/// are torn down on this pass.
	Collapsing,
}

impl NodeState {
	/// Derive the state from its inputs.
	#[inline]
	pub fn classify(is_leaf: bool, has_children: bool, own_ready: bool, children_ready: bool) -> Self {
		match (is_leaf, has_children) {
			(true, false) => NodeState::LeafResident,
			(true, true) if own_ready => NodeState::Collapsing,
			(true, true) => NodeState::AwaitingCollapse,
			(false, false) => NodeState::NeedsSplit,
			(false, true) if children_ready => NodeState::MergedToChildren,
			(false, true) => NodeState::AwaitingChildren,
		}
	}
}

/// Statistics from one `update` pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoaderStats {
	/// Nodes subdivided.
	pub splits: usize,
	/// Subtrees torn down.
	pub collapses: usize,
	/// Chunk meshes requested.
	pub requested: usize,
	/// Requests refused by a saturated scheduler.
	pub deferred: usize,
	/// Meshes installed into placeholders.
	pub installed: usize,
	/// Meshes dropped because their chunk was already gone.
	pub orphaned: usize,
	/// Meshes swapped in by a reload.
	pub replaced: usize,
	/// Reloads submitted for dirty nodes.
	pub reloads: usize,
	/// Chunks removed from the store.
	pub removed: usize,
	/// Chunks made visible.
	pub activated: usize,
	/// Chunks hidden.
	pub deactivated: usize,
	/// Live nodes after the pass.
	pub node_count: usize,
	/// Resident chunks after the pass, placeholders included.
	pub resident_chunks: usize,
	/// Visible chunks after the pass.
	pub visible_chunks: usize,
}

impl LoaderStats {
	/// True when the pass changed nothing in the tree or the store.
	#[inline]
	pub fn is_quiescent(&self) -> bool {
		self.splits == 0
			&& self.collapses == 0
			&& self.requested == 0
			&& self.installed == 0
			&& self.replaced == 0
			&& self.removed == 0
			&& self.activated == 0
			&& self.deactivated == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_classify() {
		assert_eq!(NodeState::classify(true, false, false, false), NodeState::LeafResident);
		assert_eq!(NodeState::classify(true, true, true, true), NodeState::Collapsing);
		assert_eq!(NodeState::classify(false, false, false, false), NodeState::NeedsSplit);
		assert_eq!(NodeState::classify(false, true, true, false), NodeState::AwaitingChildren);
		assert_eq!(NodeState::classify(false, true, true, true), NodeState::MergedToChildren);
	}

	#[test]
	fn test_leaf_with_children_collapses_only_when_own_chunk_ready() {
		assert_eq!(NodeState::classify(true, true, false, true), NodeState::AwaitingCollapse);
		assert_eq!(NodeState::classify(true, true, false, false), NodeState::AwaitingCollapse);
		assert_eq!(NodeState::classify(true, true, true, false), NodeState::Collapsing);
	}

	#[test]
	fn test_default_stats_are_quiescent() {
		let stats = LoaderStats::default();
		assert!(stats.is_quiescent());
		assert!(!LoaderStats { splits: 1, ..Default::default() }.is_quiescent());
	}
}
