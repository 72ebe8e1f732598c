use std::collections::BTreeSet;

/// Identities picked for a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<Id> {
	ids: BTreeSet<Id>,
}
impl<Id> SelectionSet<Id>
where
	Id: Copy + Ord,
{
	pub fn new() -> Self {
		Self { ids: BTreeSet::new() }
	}

	/// Flips membership and returns whether `id` is now selected.
	pub fn toggle(&mut self, id: Id) -> bool {
		if self.ids.remove(&id) {
			false
		} else {
			self.ids.insert(id);

			true
		}
	}

	pub fn contains(&self, id: Id) -> bool {
		self.ids.contains(&id)
	}

	pub fn clear(&mut self) {
		self.ids.clear();
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// The batch payload, in ascending order.
	pub fn to_payload(&self) -> Vec<Id> {
		self.ids.iter().copied().collect()
	}
}
impl<Id> Default for SelectionSet<Id>
where
	Id: Copy + Ord,
{
	fn default() -> Self {
		Self::new()
	}
}
