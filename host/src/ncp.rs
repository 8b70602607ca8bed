use zigbee::ezsp::{ EmberApsFrame, EmberDeviceUpdate, EmberEUI64, EmberIncomingMessageType, EmberJoinDecision, EmberNodeId, EmberOutgoingMessageType, EzspStatus, SlStatus };
use zigbee::gp::GpIncoming;
use crate::config::TransportConfig;

//Per-packet radio metadata reported alongside incoming stack callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketInfo {
	pub sender_short_id: EmberNodeId,
	pub last_hop_lqi: u8,
	pub last_hop_rssi: i8,
}

//Callbacks the stack completes on its own context. The tick drains them as
//owned values, so their buffers never alias transport memory.
#[derive(Debug, Clone)]
pub enum StackCallback {
	EzspError {
		status: EzspStatus,
	},
	StackStatus {
		status: SlStatus,
	},
	MessageSent {
		status: SlStatus,
		message_type: EmberOutgoingMessageType,
		index_or_destination: u16,
		aps_frame: EmberApsFrame,
		message_tag: u16,
		message_contents: Vec<u8>,
	},
	IncomingMessage {
		message_type: EmberIncomingMessageType,
		aps_frame: EmberApsFrame,
		packet_info: PacketInfo,
		message_contents: Vec<u8>,
	},
	MacFilterMatchMessage {
		packet_info: PacketInfo,
		message_contents: Vec<u8>,
	},
	TrustCenterJoin {
		new_node_id: EmberNodeId,
		new_node_eui64: EmberEUI64,
		status: EmberDeviceUpdate,
		policy_decision: EmberJoinDecision,
		parent_of_new_node_id: EmberNodeId,
	},
	GpepIncomingMessage(GpIncoming),
	RouteError {
		status: SlStatus,
		target: EmberNodeId,
	},
	NetworkStatus {
		error_code: u8,
		target: EmberNodeId,
	},
	IdConflict {
		id: EmberNodeId,
	},
	KeyEstablishment {
		partner: EmberEUI64,
		status: u8,
	},
}

//The serial transport and EZSP marshalling layer behind a fixed call contract.
//tick() services the link and must not block; it returns whichever stack
//callbacks completed since the previous tick, in completion order.
pub trait Ncp: Send {
	fn init(&mut self, config: &TransportConfig);
	fn start(&mut self) -> EzspStatus;
	fn stop(&mut self);

	fn tick(&mut self) -> Vec<StackCallback>;

	//returns the status and the APS sequence number assigned by the NCP
	fn send_unicast(&mut self, message_type: EmberOutgoingMessageType, index_or_destination: EmberNodeId, aps_frame: &EmberApsFrame, message_tag: u16, message_contents: &[u8]) -> (SlStatus, u8);
	fn send_multicast(&mut self, aps_frame: &EmberApsFrame, hops: u8, broadcast_addr: u16, alias: EmberNodeId, nwk_sequence: u8, message_tag: u16, message_contents: &[u8]) -> SlStatus;
	fn send_broadcast(&mut self, alias: EmberNodeId, destination: EmberNodeId, nwk_sequence: u8, aps_frame: &EmberApsFrame, radius: u8, message_tag: u16, message_contents: &[u8]) -> SlStatus;
	fn send_raw_message(&mut self, message_contents: &[u8], priority: u8, use_cca: bool) -> SlStatus;
}
