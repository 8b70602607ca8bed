use zigbee::ezsp::{ EmberApsFrame, EmberDeviceUpdate, EmberIncomingMessageType, EmberJoinDecision, EmberNodeId, EmberOutgoingMessageType, EzspStatus, SlStatus };

//Normalized events delivered to the application consumer. Every variant owns
//its buffers; EUI64 addresses are rendered as "0x" plus 16 lowercase hex
//digits, most significant byte first.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	NcpNeedsResetAndInit {
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
	ZdoResponse {
		aps_frame: EmberApsFrame,
		sender: EmberNodeId,
		message_contents: Vec<u8>,
	},
	IncomingMessage {
		message_type: EmberIncomingMessageType,
		aps_frame: EmberApsFrame,
		last_hop_lqi: u8,
		sender: EmberNodeId,
		message_contents: Vec<u8>,
	},
	TouchlinkMessage {
		source_pan_id: u16,
		source_address: String,
		group_id: u16,
		last_hop_lqi: u8,
		message_contents: Vec<u8>,
	},
	TrustCenterJoin {
		new_node_id: EmberNodeId,
		new_node_eui64: String,
		status: EmberDeviceUpdate,
		policy_decision: EmberJoinDecision,
		parent_of_new_node_id: EmberNodeId,
	},
}
