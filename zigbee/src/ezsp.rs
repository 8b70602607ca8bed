use deku::{ self, prelude::* };

#[derive(Debug)]
pub enum Error {
	BufferTooShort,
	Deku(deku::DekuError),
}

impl core::fmt::Display for Error {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::BufferTooShort => write!(f, "{self:?}"),
			Self::Deku(e) => e.fmt(f),
		}
	}
}

impl From<deku::DekuError> for Error {
	fn from(e: deku::DekuError) -> Self {
		Error::Deku(e)
	}
}

pub type EmberNodeId = u16; //16-bit ZigBee network address.
pub type EmberMulticastId = u16; //16-bit ZigBee multicast group identifier.
pub type EmberEUI64 = [u8; 8]; //EUI 64-bit ID (an IEEE address), least significant byte first.
pub type EmberApsOption = u16; //Options to use when sending a message.
pub type EmberDeviceUpdate = u8; //The status of the device update.

pub const EMBER_NULL_NODE_ID: EmberNodeId = 0xFFFF; //A distinguished network ID that will never be assigned to any node.
pub const ZA_MAX_HOPS: u8 = 12; //Default radius for multicast and broadcast transmissions.

pub const EMBER_APS_OPTION_NONE: u16 = 0x0000; //No options.
pub const EMBER_APS_OPTION_USE_ALIAS_SEQUENCE_NUMBER: u16 = 0x0008; //Transmit the message with the alias source address and the alias sequence number supplied by the caller.
pub const EMBER_APS_OPTION_ENCRYPTION: u16 = 0x0020; //Send the message using APS Encryption, using the Link Key shared with the destination node to encrypt the data at the APS Level.
pub const EMBER_APS_OPTION_RETRY: u16 = 0x0040; //Resend the message using the APS retry mechanism.
pub const EMBER_APS_OPTION_ENABLE_ROUTE_DISCOVERY: u16 = 0x0100; //Causes a route discovery to be initiated if no route to the destination is known.

//Status values reported by the NCP through the error handler and the lifecycle calls.
#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq)]
#[deku(id_type = "u8")]
pub enum EzspStatus {
	#[deku(id = "0x00")]
	EzspSuccess, //Success.
	#[deku(id = "0x20")]
	EzspAshInProgress, //Operation not yet complete.
	#[deku(id = "0x21")]
	EzspHostFatalError, //Fatal error detected by host.
	#[deku(id = "0x22")]
	EzspAshNcpFatalError, //Fatal error detected by NCP.
	#[deku(id = "0x23")]
	EzspDataFrameTooLong, //Tried to send DATA frame too long.
	#[deku(id = "0x24")]
	EzspDataFrameTooShort, //Tried to send DATA frame too short.
	#[deku(id = "0x25")]
	EzspNoTxSpace, //No space for tx'ed DATA frame.
	#[deku(id = "0x26")]
	EzspNoRxSpace, //No space for rec'd DATA frame.
	#[deku(id = "0x27")]
	EzspNoRxData, //No receive data available.
	#[deku(id = "0x28")]
	EzspNotConnected, //Not in Connected state.
	#[deku(id = "0x30")]
	EzspErrorVersionNotSet, //The NCP received a command before the EZSP version had been set.
	#[deku(id = "0x31")]
	EzspErrorInvalidFrameId, //The NCP received a command containing an unsupported frame ID.
	#[deku(id = "0x32")]
	EzspErrorWrongDirection, //The direction flag in the frame control field was incorrect.
	#[deku(id = "0x33")]
	EzspErrorTruncated, //The truncated flag in the frame control field was set, indicating there was not enough memory available to complete the response or that the response would have exceeded the maximum EZSP frame length.
	#[deku(id = "0x34")]
	EzspErrorOverflow, //The overflow flag in the frame control field was set, indicating one or more callbacks occurred since the previous response and there was not enough memory available to report them to the Host.
	#[deku(id = "0x35")]
	EzspErrorOutOfMemory, //Insufficient memory was available.
	#[deku(id = "0x36")]
	EzspErrorInvalidValue, //The value was out of bounds.
	#[deku(id = "0x37")]
	EzspErrorInvalidId, //The configuration id was not recognized.
	#[deku(id = "0x38")]
	EzspErrorInvalidCall, //Configuration values can no longer be modified.
	#[deku(id = "0x39")]
	EzspErrorNoResponse, //The NCP failed to respond to a command.
	#[deku(id = "0x40")]
	EzspErrorCommandTooLong, //The length of the command exceeded the maximum EZSP frame length.
	#[deku(id = "0x41")]
	EzspErrorQueueFull, //The UART receive queue was full causing a callback response to be dropped.
	#[deku(id = "0x42")]
	EzspErrorCommandFiltered, //The command has been filtered out by NCP.
	#[deku(id = "0x43")]
	EzspErrorSecurityKeyAlreadySet, //EZSP Security Key is already set
	#[deku(id = "0x44")]
	EzspErrorSecurityTypeInvalid, //EZSP Security Type is invalid
	#[deku(id = "0x45")]
	EzspErrorSecurityParametersInvalid, //EZSP Security Parameters are invalid
	#[deku(id = "0x46")]
	EzspErrorSecurityParametersAlreadySet, //EZSP Security Parameters are already set
	#[deku(id = "0x47")]
	EzspErrorSecurityKeyNotSet, //EZSP Security Key is not set
	#[deku(id = "0x48")]
	EzspErrorSecurityParametersNotSet, //EZSP Security Parameters are not set
	#[deku(id = "0x49")]
	EzspErrorUnsupportedControl, //Received frame with unsupported control byte
	#[deku(id = "0x4A")]
	EzspErrorUnsecureFrame, //Received frame is unsecure, when security is established
	#[deku(id = "0x50")]
	EzspAshErrorVersion, //Incompatible ASH version
	#[deku(id = "0x51")]
	EzspAshErrorTimeouts, //Exceeded max ACK timeouts
	#[deku(id = "0x52")]
	EzspAshErrorResetFail, //Timed out waiting for RSTACK
	#[deku(id = "0x53")]
	EzspAshErrorNcpReset, //Unexpected ncp reset
	#[deku(id = "0x54")]
	EzspErrorSerialInit, //Serial port initialization failed
	#[deku(id = "0x55")]
	EzspAshErrorNcpType, //Invalid ncp processor type
	#[deku(id = "0x56")]
	EzspAshErrorResetMethod, //Invalid ncp reset method
	#[deku(id = "0x57")]
	EzspAshErrorXonXoff, //XON/XOFF not supported by host driver
	#[deku(id_pat = "_")]
	Unknown(u8),
}

//Stack-wide status codes carried by stack status and message sent callbacks.
#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq)]
#[deku(id_type = "u32")]
pub enum SlStatus {
	#[deku(id = "0x0000")]
	SlStatusOk, //No error.
	#[deku(id = "0x0001")]
	SlStatusFail, //Generic error.
	#[deku(id = "0x0002")]
	SlStatusInvalidState, //Generic invalid state error.
	#[deku(id = "0x0004")]
	SlStatusBusy, //Module is busy and cannot carry out requested operation.
	#[deku(id = "0x0021")]
	SlStatusInvalidParameter, //Generic parameter error.
	#[deku(id = "0x0022")]
	SlStatusNullPointer, //Attempted to perform an operation on a null pointer.
	#[deku(id = "0x0901")]
	SlStatusNetworkUp, //The network is up and running.
	#[deku(id = "0x0902")]
	SlStatusNetworkDown, //The network is down.
	#[deku(id = "0x0903")]
	SlStatusNotJoined, //The node is not part of a network.
	#[deku(id = "0x0C26")]
	SlStatusZigbeeDeliveryFailed, //The message could not be delivered to its destination.
	#[deku(id_pat = "_")]
	Unknown(u32),
}

#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq)]
#[deku(id_type = "u8")]
pub enum EmberIncomingMessageType {
	#[deku(id = "0x00")]
	EmberIncomingUnicast, //Unicast.
	#[deku(id = "0x01")]
	EmberIncomingUnicastReply, //Unicast reply.
	#[deku(id = "0x02")]
	EmberIncomingMulticast, //Multicast.
	#[deku(id = "0x03")]
	EmberIncomingMulticastLoopback, //Multicast sent by the local device.
	#[deku(id = "0x04")]
	EmberIncomingBroadcast, //Broadcast.
	#[deku(id = "0x05")]
	EmberIncomingBroadcastLoopback, //Broadcast sent by the local device.
	#[deku(id = "0x06")]
	EmberIncomingManyToOneRouteRequest, //Many to one route request.
}

#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq)]
#[deku(id_type = "u8")]
pub enum EmberOutgoingMessageType {
	#[deku(id = "0x00")]
	EmberOutgoingDirect, //Unicast sent directly to an EmberNodeId.
	#[deku(id = "0x01")]
	EmberOutgoingViaAddressTable, //Unicast sent using an entry in the address table.
	#[deku(id = "0x02")]
	EmberOutgoingViaBinding, //Unicast sent using an entry in the binding table.
	#[deku(id = "0x03")]
	EmberOutgoingMulticast, //Multicast message.
	#[deku(id = "0x04")]
	EmberOutgoingMulticastWithAlias, //Multicast message sent with an alias source address and sequence number.
	#[deku(id = "0x05")]
	EmberOutgoingBroadcast, //Broadcast message.
	#[deku(id = "0x06")]
	EmberOutgoingBroadcastWithAlias, //Broadcast message sent with an alias source address and sequence number.
	#[deku(id_pat = "_")]
	Unknown(u8),
}

#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq)]
#[deku(id_type = "u8")]
pub enum EmberJoinDecision {
	#[deku(id = "0x00")]
	EmberUsePreconfiguredKey, //Allow the node to join. The joining node should have a pre-configured key. The security data sent to it will be encrypted with that key.
	#[deku(id = "0x01")]
	EmberSendKeyInTheClear, //Allow the node to join. Send the network key in-the-clear to the joining device.
	#[deku(id = "0x02")]
	EmberDenyJoin, //Deny join.
	#[deku(id = "0x03")]
	EmberNoAction, //Take no action.
}

//ZigBee APS frame parameters.
#[derive(Debug, DekuRead, DekuWrite, Clone, PartialEq)]
pub struct EmberApsFrame {
	pub profile_id: u16, //The application profile ID that describes the format of the message.
	pub cluster_id: u16, //The cluster ID for this message.
	pub source_endpoint: u8, //The source endpoint.
	pub destination_endpoint: u8, //The destination endpoint.
	pub options: EmberApsOption, //A bitmask of options.
	pub group_id: u16, //The group ID for this message, if it is multicast mode.
	pub sequence: u8, //The sequence number.
	pub radius: u8, //The message's network radius, used in place of the default when the alias options apply.
}

pub fn eui64_to_string(eui64: &EmberEUI64) -> String {
	let mut s = String::from("0x");

	for b in eui64.iter().rev() {
		s.push_str(&format!("{:02x}", b));
	}

	s
}

pub fn eui64_from_string(s: &str) -> Option<EmberEUI64> {
	let digits = s.strip_prefix("0x").unwrap_or(s);

	if digits.len() != 16 {
		return None;
	}

	let mut eui64 = [0u8; 8];

	for i in 0..8 {
		eui64[7 - i] = u8::from_str_radix(digits.get(i * 2..i * 2 + 2)?, 16).ok()?;
	}

	Some(eui64)
}
