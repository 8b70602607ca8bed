use deku::{ self, prelude::* };
use crate::ezsp::{ EmberApsFrame, EmberEUI64, EmberNodeId, Error, EMBER_APS_OPTION_NONE };

//Green power devices do not hold a network address; the proxy rebuilds a
//standard-looking APS frame and a ZCL-style notification buffer from the
//structured parameters the stack reports.

pub const GP_PROFILE_ID: u16 = 0xA1E0;
pub const GP_CLUSTER_ID: u16 = 0x0021;
pub const GP_ENDPOINT: u8 = 0xF2;
pub const GP_SINK_GROUP_ID: u16 = 0x0B84;

pub const GP_COMMISSIONING_COMMAND_ID: u8 = 0xE0;

const GP_NOTIFICATION_COMMAND_IDENTIFIER: u8 = 0x00;
const GP_COMMISSIONING_NOTIFICATION_COMMAND_IDENTIFIER: u8 = 0x04;
const GP_ZCL_FRAME_TYPE: u8 = 0x01;

//How the GPD identifies itself in the GPDF.
#[derive(Debug, Clone, PartialEq)]
pub enum GpAddress {
	SourceId(u32), //4-byte source identifier
	Ieee { address: EmberEUI64, endpoint: u8 }, //full IEEE address plus GPD endpoint
}

impl GpAddress {
	pub fn application_id(&self) -> u8 {
		match self {
			Self::SourceId(_) => 0x00,
			Self::Ieee { .. } => 0x02,
		}
	}
}

//Parameters of a GPDF reported through the green power incoming message callback.
#[derive(Debug, Clone, PartialEq)]
pub struct GpIncoming {
	pub gpd_link: u8, //link quality of the GPDF as received by the proxy
	pub sequence_number: u8,
	pub addr: GpAddress,
	pub gpdf_security_level: u8,
	pub gpdf_security_key_type: u8,
	pub auto_commissioning: bool,
	pub bidirectional_info: u8,
	pub gpd_security_frame_counter: u32,
	pub gpd_command_id: u8,
	pub gpd_command_payload: Vec<u8>,
}

//ZCL-style green power notification header prepended to the forwarded GPDF payload.
#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq)]
#[deku(endian = "little")]
pub struct GpNotification {
	pub frame_control: u8,
	pub sequence: u8,
	pub command_identifier: u8,
	pub options: u16,
	pub source_id: u32,
	pub frame_counter: u32,
	pub gpd_command_id: u8,
	pub payload_length: u8,
	#[deku(count = "payload_length")]
	pub payload: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub enum GpOutcome {
	Message {
		aps_frame: EmberApsFrame,
		sender: EmberNodeId,
		message_contents: Vec<u8>,
	},
	UnsupportedAddress, //IEEE-addressed GPDs are not proxied, caller should log
	Duplicate, //zero-payload commissioning replay, drop without a trace
}

pub fn reconstruct(msg: &GpIncoming) -> Result<GpOutcome, Error> {
	let source_id = match &msg.addr {
		GpAddress::SourceId(source_id) => *source_id,
		GpAddress::Ieee { .. } => { return Ok(GpOutcome::UnsupportedAddress); }
	};

	let application_id = msg.addr.application_id() as u16;
	let bidirectional = (msg.bidirectional_info & 0x01) as u16;
	let security_level = (msg.gpdf_security_level & 0x03) as u16;
	let security_key_type = (msg.gpdf_security_key_type & 0x07) as u16;

	let (command_identifier, options) = if msg.gpd_command_id == GP_COMMISSIONING_COMMAND_ID {
		//some devices notify commissioning twice, the second time with an empty
		//payload; forwarding it would corrupt downstream commissioning state
		if msg.gpd_command_payload.is_empty() {
			return Ok(GpOutcome::Duplicate);
		}

		(
			GP_COMMISSIONING_NOTIFICATION_COMMAND_IDENTIFIER,
			application_id | bidirectional << 3 | security_level << 4 | security_key_type << 6,
		)
	}
	else {
		(
			GP_NOTIFICATION_COMMAND_IDENTIFIER,
			application_id | security_level << 6 | security_key_type << 8 | bidirectional << 11,
		)
	};

	let aps_frame = EmberApsFrame {
		profile_id: GP_PROFILE_ID,
		cluster_id: GP_CLUSTER_ID,
		source_endpoint: GP_ENDPOINT,
		destination_endpoint: GP_ENDPOINT,
		options: EMBER_APS_OPTION_NONE,
		group_id: GP_SINK_GROUP_ID,
		sequence: 0,
		radius: 0,
	};

	let notification = GpNotification {
		frame_control: GP_ZCL_FRAME_TYPE,
		sequence: msg.sequence_number,
		command_identifier,
		options,
		source_id,
		frame_counter: msg.gpd_security_frame_counter,
		gpd_command_id: msg.gpd_command_id,
		payload_length: msg.gpd_command_payload.len() as u8,
		payload: msg.gpd_command_payload.clone(),
	};

	Ok(GpOutcome::Message {
		aps_frame,
		sender: (source_id & 0xFFFF) as EmberNodeId,
		message_contents: notification.to_bytes()?,
	})
}
