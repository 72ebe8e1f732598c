/// A pager control's navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
	First,
	Previous,
	Next,
	Last,
	Jump(u32),
}

/// One-indexed page cursor bounded by the last known row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
	page: u32,
	page_size: u32,
	total: Option<u64>,
}
impl Pager {
	pub fn new(page_size: u32) -> Self {
		Self { page: 1, page_size: page_size.max(1), total: None }
	}

	pub fn page(&self) -> u32 {
		self.page
	}

	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	pub fn total(&self) -> Option<u64> {
		self.total
	}

	/// Number of pages for the known total; an empty result still has one page.
	pub fn page_count(&self) -> Option<u32> {
		let total = self.total?;
		let pages = total.div_ceil(u64::from(self.page_size)).max(1);

		Some(u32::try_from(pages).unwrap_or(u32::MAX))
	}

	/// Applies `request` and returns true when the page changed.
	pub fn go_to(&mut self, request: PageRequest) -> bool {
		let target = match request {
			PageRequest::First => 1,
			PageRequest::Previous => self.page.saturating_sub(1),
			PageRequest::Next => self.page.saturating_add(1),
			PageRequest::Last => match self.page_count() {
				Some(count) => count,
				None => self.page,
			},
			PageRequest::Jump(page) => page,
		};
		let target = self.bounded(target);
		let changed = target != self.page;

		self.page = target;

		changed
	}

	/// Back to page 1 with no known total, for a new query whose row count is not yet known.
	/// Returns true when the page changed.
	pub fn reset(&mut self) -> bool {
		let changed = self.page != 1;

		self.page = 1;
		self.total = None;

		changed
	}

	/// Records a fresh total and pulls the cursor back onto the last page if it now lies past
	/// it. Returns true when the page changed.
	pub fn set_total(&mut self, total: u64) -> bool {
		self.total = Some(total);

		let bounded = self.bounded(self.page);
		let changed = bounded != self.page;

		self.page = bounded;

		changed
	}

	fn bounded(&self, page: u32) -> u32 {
		let page = page.max(1);

		match self.page_count() {
			Some(count) => page.min(count),
			None => page,
		}
	}
}
