use std::sync::atomic::{ AtomicU8, Ordering };
use zigbee::ezsp::{ EmberApsFrame, EmberNodeId, EmberOutgoingMessageType, SlStatus, EMBER_APS_OPTION_USE_ALIAS_SEQUENCE_NUMBER, EMBER_NULL_NODE_ID, ZA_MAX_HOPS };
use zigbee::gp::GP_ENDPOINT;
use crate::ncp::Ncp;

//7-bit message tag stamped on every outgoing message. Pre-increments, so a
//fresh session hands out 1 first; after 127 the mask wraps it through 0.
pub struct MessageTagCounter {
	value: AtomicU8,
}

impl MessageTagCounter {
	pub const fn new() -> Self {
		Self { value: AtomicU8::new(0) }
	}

	pub fn next(&self) -> u8 {
		let prev = self.value
			.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some((v + 1) & 0x7F))
			.expect("the update closure always returns Some");

		(prev + 1) & 0x7F
	}

	pub fn reset(&self) {
		self.value.store(0, Ordering::Relaxed);
	}
}

impl Default for MessageTagCounter {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendResult {
	pub status: SlStatus,
	pub message_tag: u8,
	pub sequence: Option<u8>, //assigned by the NCP for unicasts only
}

fn gp_aliased(aps_frame: &EmberApsFrame) -> bool {
	aps_frame.source_endpoint == GP_ENDPOINT
		&& aps_frame.destination_endpoint == GP_ENDPOINT
		&& aps_frame.options & EMBER_APS_OPTION_USE_ALIAS_SEQUENCE_NUMBER != 0
}

//Routes an outgoing intent to the matching send primitive. Unicast sequence
//numbers are assigned by the NCP and written back into the caller's frame;
//multicast and broadcast sequence numbers are caller supplied.
pub fn send<N: Ncp>(
	ncp: &mut N,
	tags: &MessageTagCounter,
	message_type: EmberOutgoingMessageType,
	index_or_destination: EmberNodeId,
	aps_frame: &mut EmberApsFrame,
	message_contents: &[u8],
	alias: Option<EmberNodeId>,
	nwk_sequence: Option<u8>,
) -> SendResult {
	let message_tag = tags.next();
	let nwk_sequence = nwk_sequence.unwrap_or(0);

	let use_alias = matches!(message_type, EmberOutgoingMessageType::EmberOutgoingMulticastWithAlias | EmberOutgoingMessageType::EmberOutgoingBroadcastWithAlias)
		|| gp_aliased(aps_frame);

	let (nwk_radius, nwk_alias) = if use_alias {
		(aps_frame.radius, alias.unwrap_or(EMBER_NULL_NODE_ID))
	}
	else {
		(ZA_MAX_HOPS, EMBER_NULL_NODE_ID)
	};

	match message_type {
		EmberOutgoingMessageType::EmberOutgoingDirect
		| EmberOutgoingMessageType::EmberOutgoingViaAddressTable
		| EmberOutgoingMessageType::EmberOutgoingViaBinding => {
			let (status, sequence) = ncp.send_unicast(message_type, index_or_destination, aps_frame, message_tag as u16, message_contents);

			aps_frame.sequence = sequence;

			SendResult { status, message_tag, sequence: Some(sequence) }
		},
		EmberOutgoingMessageType::EmberOutgoingMulticast
		| EmberOutgoingMessageType::EmberOutgoingMulticastWithAlias => {
			let status = ncp.send_multicast(aps_frame, nwk_radius, 0, nwk_alias, nwk_sequence, message_tag as u16, message_contents);

			SendResult { status, message_tag, sequence: None }
		},
		EmberOutgoingMessageType::EmberOutgoingBroadcast
		| EmberOutgoingMessageType::EmberOutgoingBroadcastWithAlias => {
			let status = ncp.send_broadcast(nwk_alias, index_or_destination, nwk_sequence, aps_frame, nwk_radius, message_tag as u16, message_contents);

			SendResult { status, message_tag, sequence: None }
		},
		EmberOutgoingMessageType::Unknown(_) => {
			SendResult { status: SlStatus::SlStatusInvalidParameter, message_tag, sequence: None }
		},
	}
}
