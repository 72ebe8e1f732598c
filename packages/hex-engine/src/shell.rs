/// Application-wide state shared by the listing and review surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shell {
	title: String,
}
impl Shell {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn set_title(&mut self, title: impl Into<String>) {
		self.title = title.into();
	}
}
