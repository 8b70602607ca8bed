use std::collections::VecDeque;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use ezsp_host::{ Error, Event, EzspHost, Ncp, PacketInfo, StackCallback, TransportConfig };
use zigbee::ezsp::{ EmberApsFrame, EmberIncomingMessageType, EmberNodeId, EmberOutgoingMessageType, EzspStatus, SlStatus, EMBER_NULL_NODE_ID, ZA_MAX_HOPS };
use zigbee::gp::{ GpAddress, GpIncoming, GP_PROFILE_ID };

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
enum SentCall {
	Unicast { index_or_destination: u16, message_tag: u16 },
	Broadcast { alias: u16, destination: u16, radius: u8 },
	Raw { contents: Vec<u8> },
}

#[derive(Default)]
struct ScriptedState {
	started: bool,
	stopped: bool,
	script: VecDeque<Vec<StackCallback>>,
	sent: Vec<SentCall>,
}

//Transport stand-in: hands out one scripted callback batch per tick and
//records every send primitive call.
struct ScriptedNcp {
	state: Arc<Mutex<ScriptedState>>,
	start_status: EzspStatus,
}

impl ScriptedNcp {
	fn new(script: Vec<Vec<StackCallback>>) -> (Self, Arc<Mutex<ScriptedState>>) {
		let state = Arc::new(Mutex::new(ScriptedState {
			script: script.into(),
			..ScriptedState::default()
		}));

		(Self { state: state.clone(), start_status: EzspStatus::EzspSuccess }, state)
	}
}

impl Ncp for ScriptedNcp {
	fn init(&mut self, _config: &TransportConfig) {}

	fn start(&mut self) -> EzspStatus {
		self.state.lock().unwrap().started = true;
		self.start_status.clone()
	}

	fn stop(&mut self) {
		self.state.lock().unwrap().stopped = true;
	}

	fn tick(&mut self) -> Vec<StackCallback> {
		self.state.lock().unwrap().script.pop_front().unwrap_or_default()
	}

	fn send_unicast(&mut self, _message_type: EmberOutgoingMessageType, index_or_destination: EmberNodeId, _aps_frame: &EmberApsFrame, message_tag: u16, _message_contents: &[u8]) -> (SlStatus, u8) {
		self.state.lock().unwrap().sent.push(SentCall::Unicast { index_or_destination, message_tag });
		(SlStatus::SlStatusOk, 0x5A)
	}

	fn send_multicast(&mut self, _aps_frame: &EmberApsFrame, _hops: u8, _broadcast_addr: u16, _alias: EmberNodeId, _nwk_sequence: u8, _message_tag: u16, _message_contents: &[u8]) -> SlStatus {
		SlStatus::SlStatusOk
	}

	fn send_broadcast(&mut self, alias: EmberNodeId, destination: EmberNodeId, _nwk_sequence: u8, _aps_frame: &EmberApsFrame, radius: u8, _message_tag: u16, _message_contents: &[u8]) -> SlStatus {
		self.state.lock().unwrap().sent.push(SentCall::Broadcast { alias, destination, radius });
		SlStatus::SlStatusOk
	}

	fn send_raw_message(&mut self, message_contents: &[u8], _priority: u8, _use_cca: bool) -> SlStatus {
		self.state.lock().unwrap().sent.push(SentCall::Raw { contents: message_contents.to_vec() });
		SlStatus::SlStatusOk
	}
}

fn config() -> TransportConfig {
	let mut config = TransportConfig::default();

	config.serial_port = "/dev/ttyUSB0".to_string();

	config
}

fn aps_frame(profile_id: u16) -> EmberApsFrame {
	EmberApsFrame {
		profile_id,
		cluster_id: 0x0006,
		source_endpoint: 1,
		destination_endpoint: 1,
		options: 0,
		group_id: 0,
		sequence: 0,
		radius: 0,
	}
}

fn packet_info(sender: u16, lqi: u8) -> PacketInfo {
	PacketInfo { sender_short_id: sender, last_hop_lqi: lqi, last_hop_rssi: -40 }
}

//a minimal valid long-destination touchlink frame with a 1-byte payload
fn touchlink_frame(payload: &[u8]) -> Vec<u8> {
	let mut raw = Vec::new();

	raw.extend_from_slice(&0xCC01u16.to_le_bytes()); //long dest, long source, data
	raw.push(0x01); //MAC sequence
	raw.extend_from_slice(&[0xFF, 0xFF]); //destination PAN
	raw.extend_from_slice(&[0x22; 8]); //destination address
	raw.extend_from_slice(&0xABCDu16.to_le_bytes()); //source PAN
	raw.extend_from_slice(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]); //source address
	raw.extend_from_slice(&0x000Bu16.to_le_bytes()); //stub NWK frame control
	raw.push(0x03); //APS: inter-PAN, unicast
	raw.extend_from_slice(&0x1000u16.to_le_bytes()); //touchlink cluster
	raw.extend_from_slice(&0xC05Eu16.to_le_bytes()); //touchlink profile
	raw.extend_from_slice(payload);

	raw
}

#[test]
fn scripted_session_produces_the_ordered_event_stream() {
	let script = vec![
		vec![StackCallback::StackStatus { status: SlStatus::SlStatusNetworkUp }],
		vec![StackCallback::IncomingMessage {
			message_type: EmberIncomingMessageType::EmberIncomingUnicast,
			aps_frame: aps_frame(0x0104),
			packet_info: packet_info(0x1111, 200),
			message_contents: vec![0x18, 0x01, 0x0A],
		}],
		vec![StackCallback::IncomingMessage {
			message_type: EmberIncomingMessageType::EmberIncomingUnicast,
			aps_frame: aps_frame(0x0000),
			packet_info: packet_info(0x2222, 190),
			message_contents: vec![0x00, 0x81],
		}],
		vec![StackCallback::IncomingMessage {
			message_type: EmberIncomingMessageType::EmberIncomingBroadcastLoopback,
			aps_frame: aps_frame(0x0104),
			packet_info: packet_info(0x0000, 255),
			message_contents: vec![0x00],
		}],
		vec![StackCallback::MacFilterMatchMessage {
			packet_info: packet_info(0xFFFF, 120),
			message_contents: touchlink_frame(&[0x42]),
		}],
		vec![StackCallback::GpepIncomingMessage(GpIncoming {
			gpd_link: 0x80,
			sequence_number: 7,
			addr: GpAddress::SourceId(0x01020304),
			gpdf_security_level: 0,
			gpdf_security_key_type: 0,
			auto_commissioning: false,
			bidirectional_info: 0,
			gpd_security_frame_counter: 9,
			gpd_command_id: 0x22,
			gpd_command_payload: vec![],
		})],
		vec![StackCallback::EzspError { status: EzspStatus::EzspErrorQueueFull }],
		vec![StackCallback::EzspError { status: EzspStatus::EzspAshErrorTimeouts }],
	];

	let (ncp, state) = ScriptedNcp::new(script);
	let mut host = EzspHost::new(ncp, config()).unwrap();
	let rx = host.start().unwrap();

	assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), Event::StackStatus { status: SlStatus::SlStatusNetworkUp });

	match rx.recv_timeout(RECV_TIMEOUT).unwrap() {
		Event::IncomingMessage { sender, last_hop_lqi, message_contents, .. } => {
			assert_eq!(sender, 0x1111);
			assert_eq!(last_hop_lqi, 200);
			assert_eq!(message_contents, vec![0x18, 0x01, 0x0A]);
		},
		other => panic!("expected incoming message, got {:?}", other),
	}

	match rx.recv_timeout(RECV_TIMEOUT).unwrap() {
		Event::ZdoResponse { sender, message_contents, .. } => {
			assert_eq!(sender, 0x2222);
			assert_eq!(message_contents, vec![0x00, 0x81]);
		},
		other => panic!("expected zdo response, got {:?}", other),
	}

	//the broadcast loopback was dropped, so the touchlink frame comes next
	match rx.recv_timeout(RECV_TIMEOUT).unwrap() {
		Event::TouchlinkMessage { source_pan_id, source_address, group_id, last_hop_lqi, message_contents } => {
			assert_eq!(source_pan_id, 0xABCD);
			assert_eq!(source_address, "0xefcdab8967452301");
			assert_eq!(group_id, 0);
			assert_eq!(last_hop_lqi, 120);
			assert_eq!(message_contents, vec![0x42]);
		},
		other => panic!("expected touchlink message, got {:?}", other),
	}

	match rx.recv_timeout(RECV_TIMEOUT).unwrap() {
		Event::IncomingMessage { message_type, aps_frame, sender, last_hop_lqi, .. } => {
			assert_eq!(message_type, EmberIncomingMessageType::EmberIncomingUnicast);
			assert_eq!(aps_frame.profile_id, GP_PROFILE_ID);
			assert_eq!(sender, 0x0304);
			assert_eq!(last_hop_lqi, 0x80);
		},
		other => panic!("expected green power incoming message, got {:?}", other),
	}

	//queue full is log-only; the timeout error requests a reset
	assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), Event::NcpNeedsResetAndInit { status: EzspStatus::EzspAshErrorTimeouts });

	host.stop();

	let state = state.lock().unwrap();

	assert!(state.started);
	assert!(state.stopped);
}

#[test]
fn sends_go_through_the_dispatcher() {
	let (ncp, state) = ScriptedNcp::new(Vec::new());
	let mut host = EzspHost::new(ncp, config()).unwrap();
	let _rx = host.start().unwrap();

	let mut frame = aps_frame(0x0104);
	let result = host.send(EmberOutgoingMessageType::EmberOutgoingDirect, 0x1234, &mut frame, &[0x01, 0x02], None, None).unwrap();

	assert_eq!(result.status, SlStatus::SlStatusOk);
	assert_eq!(result.message_tag, 1);
	assert_eq!(frame.sequence, 0x5A);

	let result = host.send(EmberOutgoingMessageType::EmberOutgoingBroadcast, 0xFFFC, &mut frame, &[0x03], None, None).unwrap();

	assert_eq!(result.message_tag, 2);

	host.send_raw(&[0xAA, 0xBB], 1, true).unwrap();

	host.stop();

	let state = state.lock().unwrap();

	assert_eq!(state.sent, vec![
		SentCall::Unicast { index_or_destination: 0x1234, message_tag: 1 },
		SentCall::Broadcast { alias: EMBER_NULL_NODE_ID, destination: 0xFFFC, radius: ZA_MAX_HOPS },
		SentCall::Raw { contents: vec![0xAA, 0xBB] },
	]);
}

#[test]
fn failed_start_closes_the_session() {
	let (mut ncp, _state) = ScriptedNcp::new(Vec::new());

	ncp.start_status = EzspStatus::EzspErrorSerialInit;

	let mut host = EzspHost::new(ncp, config()).unwrap();

	assert!(matches!(host.start(), Err(Error::StartFailed(EzspStatus::EzspErrorSerialInit))));
	assert!(!host.is_running());
}

#[test]
fn restart_resets_the_message_tags() {
	let (ncp, _state) = ScriptedNcp::new(Vec::new());
	let mut host = EzspHost::new(ncp, config()).unwrap();

	let _rx = host.start().unwrap();
	let mut frame = aps_frame(0x0104);

	assert_eq!(host.send(EmberOutgoingMessageType::EmberOutgoingDirect, 1, &mut frame, &[0x01], None, None).unwrap().message_tag, 1);
	assert_eq!(host.send(EmberOutgoingMessageType::EmberOutgoingDirect, 1, &mut frame, &[0x01], None, None).unwrap().message_tag, 2);

	host.stop();

	let _rx = host.start().unwrap();

	assert_eq!(host.send(EmberOutgoingMessageType::EmberOutgoingDirect, 1, &mut frame, &[0x01], None, None).unwrap().message_tag, 1);

	host.stop();
}
