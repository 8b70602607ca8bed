use std::sync::{ Mutex, mpsc::{ self, Receiver, SyncSender } };
use crate::event::Event;

//events buffered between the stack context and the consumer before producers block
pub const EVENT_QUEUE_DEPTH: usize = 64;

//Hand-off point between the stack-callback context and the single application
//consumer. Emissions are delivered in call order and block the producer once
//the queue is full; while the bridge is closed, emissions are no-ops.
pub struct EventBridge {
	tx: Mutex<Option<SyncSender<Event>>>,
}

impl EventBridge {
	pub fn new() -> Self {
		Self { tx: Mutex::new(None) }
	}

	pub fn open(&self) -> Receiver<Event> {
		let (tx, rx) = mpsc::sync_channel(EVENT_QUEUE_DEPTH);

		*self.tx.lock().unwrap() = Some(tx);

		rx
	}

	pub fn close(&self) {
		*self.tx.lock().unwrap() = None;
	}

	pub fn is_open(&self) -> bool {
		self.tx.lock().unwrap().is_some()
	}

	//the lock is held across the send so concurrent producers keep call order
	pub fn emit(&self, event: Event) {
		let mut guard = self.tx.lock().unwrap();

		if let Some(tx) = guard.as_ref() {
			if tx.send(event).is_err() {
				//consumer went away, stop accepting events
				*guard = None;
			}
		}
	}
}

impl Default for EventBridge {
	fn default() -> Self {
		Self::new()
	}
}
