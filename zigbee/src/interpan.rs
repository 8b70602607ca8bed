use crate::ezsp::EmberEUI64;

//Reassembly of raw 802.15.4 frames captured by the MAC filter into touchlink
//commissioning messages. Everything here is a pure function over the captured
//bytes; unmatched frames are routine radio noise and parse to Skip.

pub const TOUCHLINK_PROFILE_ID: u16 = 0xC05E;
pub const TOUCHLINK_CLUSTER_ID: u16 = 0x1000;

const MAC_FRAME_TYPE_DATA: u16 = 0x0001;
const MAC_ACK_REQUIRED: u16 = 0x0020;
const MAC_DEST_MODE_SHORT: u16 = 0x0800;
const MAC_DEST_MODE_LONG: u16 = 0x0C00;
const MAC_SOURCE_MODE_LONG: u16 = 0xC000;

//frame control + sequence + destination PAN + destination address
const SHORT_DEST_FRAME_CONTROL: u16 = MAC_FRAME_TYPE_DATA | MAC_DEST_MODE_SHORT | MAC_SOURCE_MODE_LONG;
const SHORT_DEST_HEADER_SIZE: usize = 2 + 1 + 2 + 2;
const LONG_DEST_FRAME_CONTROL: u16 = MAC_FRAME_TYPE_DATA | MAC_DEST_MODE_LONG | MAC_SOURCE_MODE_LONG;
const LONG_DEST_HEADER_SIZE: usize = 2 + 1 + 2 + 8;

const STUB_NWK_FRAME_CONTROL: u16 = 0x000B;
const STUB_NWK_SIZE: usize = 2;

const INTERPAN_APS_FRAME_TYPE: u8 = 0x03;
const INTERPAN_APS_FRAME_DELIVERY_MODE_MASK: u8 = 0x0C;
const INTERPAN_APS_FRAME_SECURITY: u8 = 0x20;

const INTERPAN_APS_UNICAST_BROADCAST_SIZE: usize = 1 + 2 + 2; //frame control + cluster + profile
const INTERPAN_APS_MULTICAST_SIZE: usize = 1 + 2 + 2 + 2; //frame control + group + cluster + profile
const MIN_STUB_APS_SIZE: usize = INTERPAN_APS_UNICAST_BROADCAST_SIZE;

const APS_DELIVERY_UNICAST: u8 = 0x00;
const APS_DELIVERY_BROADCAST: u8 = 0x08;
const APS_DELIVERY_MULTICAST: u8 = 0x0C;

#[derive(Debug, Clone, PartialEq)]
pub struct TouchlinkMessage {
	pub source_pan_id: u16,
	pub source_address: EmberEUI64,
	pub group_id: u16, //0 unless the frame was multicast
	pub payload: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub enum InterPanOutcome {
	Message(TouchlinkMessage),
	Skip, //not a touchlink inter-PAN frame, drop without a trace
	BadApsFrameControl(u8), //diagnostic, caller should log
	BadDeliveryMode(u8), //diagnostic, caller should log
}

fn read_u16(raw: &[u8], finger: usize) -> Option<u16> {
	Some(u16::from_le_bytes([*raw.get(finger)?, *raw.get(finger + 1)?]))
}

pub fn parse_interpan(raw: &[u8]) -> InterPanOutcome {
	let mut finger = 0;

	let mac_frame_control = match read_u16(raw, finger) {
		Some(fc) => fc & !MAC_ACK_REQUIRED,
		None => { return InterPanOutcome::Skip; }
	};

	match mac_frame_control {
		LONG_DEST_FRAME_CONTROL => { finger += LONG_DEST_HEADER_SIZE; },
		SHORT_DEST_FRAME_CONTROL => { finger += SHORT_DEST_HEADER_SIZE; },
		_ => { return InterPanOutcome::Skip; }
	}

	let source_pan_id = match read_u16(raw, finger) {
		Some(pan) => pan,
		None => { return InterPanOutcome::Skip; }
	};
	finger += 2;

	let mut source_address: EmberEUI64 = [0; 8];

	match raw.get(finger..finger + 8) {
		Some(addr) => { source_address.copy_from_slice(addr); },
		None => { return InterPanOutcome::Skip; }
	}
	finger += 8;

	if raw.len() < finger + STUB_NWK_SIZE + MIN_STUB_APS_SIZE {
		return InterPanOutcome::Skip;
	}

	match read_u16(raw, finger) {
		Some(STUB_NWK_FRAME_CONTROL) => {},
		_ => { return InterPanOutcome::Skip; }
	}
	finger += STUB_NWK_SIZE;

	let aps_frame_control = raw[finger];

	if aps_frame_control & !INTERPAN_APS_FRAME_DELIVERY_MODE_MASK & !INTERPAN_APS_FRAME_SECURITY != INTERPAN_APS_FRAME_TYPE {
		return InterPanOutcome::BadApsFrameControl(aps_frame_control);
	}

	//secured inter-PAN payloads are unsupported, drop without a trace
	if aps_frame_control & INTERPAN_APS_FRAME_SECURITY != 0 {
		return InterPanOutcome::Skip;
	}

	let mut group_id = 0;

	match aps_frame_control & INTERPAN_APS_FRAME_DELIVERY_MODE_MASK {
		APS_DELIVERY_UNICAST | APS_DELIVERY_BROADCAST => {
			finger += 1;
		},
		APS_DELIVERY_MULTICAST => {
			if raw.len() < finger + INTERPAN_APS_MULTICAST_SIZE {
				return InterPanOutcome::Skip;
			}

			finger += 1;

			group_id = match read_u16(raw, finger) {
				Some(g) => g,
				None => { return InterPanOutcome::Skip; }
			};
			finger += 2;
		},
		delivery_mode => {
			return InterPanOutcome::BadDeliveryMode(delivery_mode);
		}
	}

	match read_u16(raw, finger) {
		Some(TOUCHLINK_CLUSTER_ID) => {},
		_ => { return InterPanOutcome::Skip; }
	}
	finger += 2;

	match read_u16(raw, finger) {
		Some(TOUCHLINK_PROFILE_ID) => {},
		_ => { return InterPanOutcome::Skip; }
	}
	finger += 2;

	//a zero offset here would mean the cursor never advanced, which is a parsing bug
	if finger == 0 || finger > raw.len() {
		return InterPanOutcome::Skip;
	}

	InterPanOutcome::Message(TouchlinkMessage {
		source_pan_id,
		source_address,
		group_id,
		payload: raw[finger..].to_vec(),
	})
}
