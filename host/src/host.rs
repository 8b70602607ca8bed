use std::sync::{ Arc, Mutex, atomic::{ AtomicBool, Ordering }, mpsc::Receiver };
use std::thread::{ self, JoinHandle };
use std::time::Duration;
use zigbee::ezsp::{ self, EmberApsFrame, EmberIncomingMessageType, EmberNodeId, EmberOutgoingMessageType, EzspStatus, SlStatus };
use zigbee::{ gp, interpan };
use crate::bridge::EventBridge;
use crate::classify::{ classify, ErrorAction };
use crate::config::TransportConfig;
use crate::dispatch::{ self, MessageTagCounter, SendResult };
use crate::event::Event;
use crate::ncp::{ Ncp, StackCallback };
use crate::Error;

const TICK_INTERVAL: Duration = Duration::from_millis(1);

struct TickThread {
	stop: Arc<AtomicBool>,
	handle: JoinHandle<()>,
}

//Drives the NCP with a periodic tick and fans its callbacks into the ordered
//event stream. The application consumes the Receiver returned by start() and
//issues sends from its own context; the tick thread is the only producer.
pub struct EzspHost<N: Ncp + 'static> {
	ncp: Arc<Mutex<N>>,
	bridge: Arc<EventBridge>,
	tags: Arc<MessageTagCounter>,
	config: TransportConfig,
	tick: Option<TickThread>,
}

impl<N: Ncp + 'static> EzspHost<N> {
	pub fn new(ncp: N, config: TransportConfig) -> Result<Self, Error> {
		config.validate()?;

		Ok(Self {
			ncp: Arc::new(Mutex::new(ncp)),
			bridge: Arc::new(EventBridge::new()),
			tags: Arc::new(MessageTagCounter::new()),
			config,
			tick: None,
		})
	}

	pub fn start(&mut self) -> Result<Receiver<Event>, Error> {
		if self.tick.is_some() {
			return Err(Error::AlreadyRunning);
		}

		//each session starts tagging from 1
		self.tags.reset();

		let rx = self.bridge.open();

		let status = {
			let mut ncp = self.ncp.lock().unwrap();

			ncp.init(&self.config);
			ncp.start()
		};

		if status != EzspStatus::EzspSuccess {
			self.bridge.close();

			return Err(Error::StartFailed(status));
		}

		let stop = Arc::new(AtomicBool::new(false));
		let tick_stop = stop.clone();
		let ncp = self.ncp.clone();
		let bridge = self.bridge.clone();

		let handle = thread::spawn(move || {
			while !tick_stop.load(Ordering::Relaxed) {
				let callbacks = ncp.lock().unwrap().tick();

				for callback in callbacks {
					process_callback(callback, &bridge);
				}

				thread::sleep(TICK_INTERVAL);
			}
		});

		self.tick = Some(TickThread { stop, handle });

		Ok(rx)
	}

	//Teardown order matters: the tick stops first so no producer can target a
	//released bridge, then the transport, then the bridge itself.
	//
	//Event emission blocks once the queue is full, so drain or drop the
	//Receiver before calling stop(); otherwise the join can wait on a tick
	//thread that is stuck mid-emit.
	pub fn stop(&mut self) {
		if let Some(tick) = self.tick.take() {
			tick.stop.store(true, Ordering::Relaxed);

			let _ = tick.handle.join();
		}

		self.ncp.lock().unwrap().stop();
		self.bridge.close();
	}

	pub fn is_running(&self) -> bool {
		self.tick.is_some()
	}

	pub fn send(&self, message_type: EmberOutgoingMessageType, index_or_destination: EmberNodeId, aps_frame: &mut EmberApsFrame, message_contents: &[u8], alias: Option<EmberNodeId>, nwk_sequence: Option<u8>) -> Result<SendResult, Error> {
		if self.tick.is_none() {
			return Err(Error::NotRunning);
		}

		let mut ncp = self.ncp.lock().unwrap();

		Ok(dispatch::send(&mut *ncp, &self.tags, message_type, index_or_destination, aps_frame, message_contents, alias, nwk_sequence))
	}

	pub fn send_raw(&self, message_contents: &[u8], priority: u8, use_cca: bool) -> Result<SlStatus, Error> {
		if self.tick.is_none() {
			return Err(Error::NotRunning);
		}

		Ok(self.ncp.lock().unwrap().send_raw_message(message_contents, priority, use_cca))
	}
}

impl<N: Ncp + 'static> Drop for EzspHost<N> {
	fn drop(&mut self) {
		self.stop();
	}
}

fn process_callback(callback: StackCallback, bridge: &EventBridge) {
	match callback {
		StackCallback::EzspError { status } => {
			if status != EzspStatus::EzspErrorQueueFull {
				println!("EZSP: NCP entered error state: {:?}", status);
			}

			if status == EzspStatus::EzspErrorOverflow {
				println!("EZSP: WARNING: the NCP is running out of buffers, the network may be congested");
			}

			if classify(&status) == ErrorAction::LogAndRequestReset {
				bridge.emit(Event::NcpNeedsResetAndInit { status });
			}
		},
		StackCallback::StackStatus { status } => {
			bridge.emit(Event::StackStatus { status });
		},
		StackCallback::MessageSent { status, message_type, index_or_destination, aps_frame, message_tag, message_contents } => {
			bridge.emit(Event::MessageSent { status, message_type, index_or_destination, aps_frame, message_tag, message_contents });
		},
		StackCallback::IncomingMessage { message_type, aps_frame, packet_info, message_contents } => {
			//our own broadcasts and multicasts come back as loopbacks
			if matches!(message_type, EmberIncomingMessageType::EmberIncomingBroadcastLoopback | EmberIncomingMessageType::EmberIncomingMulticastLoopback) {
				return;
			}

			if aps_frame.profile_id == 0 {
				bridge.emit(Event::ZdoResponse {
					aps_frame,
					sender: packet_info.sender_short_id,
					message_contents,
				});
			}
			else {
				bridge.emit(Event::IncomingMessage {
					message_type,
					aps_frame,
					last_hop_lqi: packet_info.last_hop_lqi,
					sender: packet_info.sender_short_id,
					message_contents,
				});
			}
		},
		StackCallback::MacFilterMatchMessage { packet_info, message_contents } => {
			match interpan::parse_interpan(&message_contents) {
				interpan::InterPanOutcome::Message(m) => {
					bridge.emit(Event::TouchlinkMessage {
						source_pan_id: m.source_pan_id,
						source_address: ezsp::eui64_to_string(&m.source_address),
						group_id: m.group_id,
						last_hop_lqi: packet_info.last_hop_lqi,
						message_contents: m.payload,
					});
				},
				interpan::InterPanOutcome::Skip => {},
				interpan::InterPanOutcome::BadApsFrameControl(fc) => {
					println!("EZSP: ERROR: unsupported inter-PAN APS frame control {:#04x}", fc);
				},
				interpan::InterPanOutcome::BadDeliveryMode(mode) => {
					println!("EZSP: ERROR: unsupported inter-PAN delivery mode {:#04x}", mode);
				},
			}
		},
		StackCallback::TrustCenterJoin { new_node_id, new_node_eui64, status, policy_decision, parent_of_new_node_id } => {
			bridge.emit(Event::TrustCenterJoin {
				new_node_id,
				new_node_eui64: ezsp::eui64_to_string(&new_node_eui64),
				status,
				policy_decision,
				parent_of_new_node_id,
			});
		},
		StackCallback::GpepIncomingMessage(msg) => {
			let gpd_link = msg.gpd_link;

			match gp::reconstruct(&msg) {
				Ok(gp::GpOutcome::Message { aps_frame, sender, message_contents }) => {
					bridge.emit(Event::IncomingMessage {
						message_type: EmberIncomingMessageType::EmberIncomingUnicast,
						aps_frame,
						last_hop_lqi: gpd_link,
						sender,
						message_contents,
					});
				},
				Ok(gp::GpOutcome::UnsupportedAddress) => {
					println!("EZSP: ERROR: IEEE-addressed green power devices are not supported");
				},
				Ok(gp::GpOutcome::Duplicate) => {},
				Err(e) => {
					println!("EZSP: ERROR: failed to rebuild green power notification: {}", e);
				},
			}
		},
		StackCallback::RouteError { status, target } => {
			println!("EZSP: Route error {:?} for target {:#06x}", status, target);
		},
		StackCallback::NetworkStatus { error_code, target } => {
			println!("EZSP: Network status {:#04x} for target {:#06x}", error_code, target);
		},
		StackCallback::IdConflict { id } => {
			println!("EZSP: ID conflict for {:#06x}", id);
		},
		StackCallback::KeyEstablishment { partner, status } => {
			println!("EZSP: Key establishment with {}: {:#04x}", ezsp::eui64_to_string(&partner), status);
		},
	}
}
