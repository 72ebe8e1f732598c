use std::fmt::{Debug, Formatter};

type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Synchronous listeners notified from state mutators, in subscription order.
pub struct Observers<E> {
	listeners: Vec<Listener<E>>,
}
impl<E> Observers<E> {
	pub fn subscribe<F>(&mut self, listener: F)
	where
		F: FnMut(&E) + Send + 'static,
	{
		self.listeners.push(Box::new(listener));
	}

	pub fn notify(&mut self, event: &E) {
		for listener in &mut self.listeners {
			listener(event);
		}
	}

	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	pub fn is_empty(&self) -> bool {
		self.listeners.is_empty()
	}
}
impl<E> Default for Observers<E> {
	fn default() -> Self {
		Self { listeners: Vec::new() }
	}
}
impl<E> Debug for Observers<E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Observers").field("listeners", &self.listeners.len()).finish()
	}
}
