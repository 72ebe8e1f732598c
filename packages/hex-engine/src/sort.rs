use hex_client::{SortColumn, SortOrder};

/// At most one active column, cycling inactive → ascending → descending → inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
	active: Option<SortColumn>,
	order: SortOrder,
}
impl SortState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn active(&self) -> Option<SortColumn> {
		self.active
	}

	pub fn order(&self) -> SortOrder {
		self.order
	}

	/// Direction shown for `column`, or `None` when it is not the active one.
	pub fn direction_of(&self, column: SortColumn) -> Option<SortOrder> {
		(self.active == Some(column)).then_some(self.order)
	}

	pub fn click(&mut self, column: SortColumn) {
		match (self.active, self.order) {
			(Some(active), SortOrder::Asc) if active == column => {
				self.order = SortOrder::Desc;
			},
			(Some(active), SortOrder::Desc) if active == column => {
				self.active = None;
				self.order = SortOrder::Asc;
			},
			_ => {
				self.active = Some(column);
				self.order = SortOrder::Asc;
			},
		}
	}
}
