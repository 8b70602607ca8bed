use serde::{ Serialize, Deserialize };
use crate::Error;

//maximum serial port name length accepted by the transport layer
const MAX_SERIAL_PORT_LEN: usize = 39;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResetMethod {
	Rst, //software reset using the RST frame
	Dtr, //hardware reset using the DTR line
	Custom,
}

//Serial link and ASH timing parameters handed to the transport layer on start.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportConfig {
	pub serial_port: String,
	pub baud_rate: u32,
	pub stop_bits: u8,
	pub rts_cts: bool, //RTS/CTS flow control, XON/XOFF otherwise
	pub out_block_len: u16, //maximum bytes per write to the serial port
	pub in_block_len: u16, //maximum bytes per read from the serial port
	pub trace_flags: u8,
	pub tx_k: u8, //transmit window size
	pub randomize: bool, //XOR transmitted payload bytes with a pseudo random sequence
	pub ack_time_init: u16, //ms, initial acknowledgement timeout
	pub ack_time_min: u16, //ms
	pub ack_time_max: u16, //ms
	pub time_rst: u16, //ms between RST frames while resetting the NCP
	pub nr_low_limit: u8, //from this many free rx buffers, clear the not-ready flag
	pub nr_high_limit: u8, //down to this many free rx buffers, set the not-ready flag
	pub nr_time: u16, //ms, not-ready flag hold time
	pub reset_method: ResetMethod,
}

impl Default for TransportConfig {
	fn default() -> Self {
		Self {
			serial_port: String::new(),
			baud_rate: 115200,
			stop_bits: 1,
			rts_cts: false,
			out_block_len: 256,
			in_block_len: 256,
			trace_flags: 0,
			tx_k: 3,
			randomize: false,
			ack_time_init: 800,
			ack_time_min: 400,
			ack_time_max: 2400,
			time_rst: 2500,
			nr_low_limit: 8,
			nr_high_limit: 12,
			nr_time: 480,
			reset_method: ResetMethod::Rst,
		}
	}
}

impl TransportConfig {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn validate(&self) -> Result<(), Error> {
		if self.serial_port.is_empty() {
			return Err(Error::InvalidConfig("serialPort is empty"));
		}

		if self.serial_port.len() > MAX_SERIAL_PORT_LEN {
			return Err(Error::InvalidConfig("serialPort is too long"));
		}

		if self.stop_bits != 1 && self.stop_bits != 2 {
			return Err(Error::InvalidConfig("stopBits must be 1 or 2"));
		}

		if self.tx_k < 1 || self.tx_k > 7 {
			return Err(Error::InvalidConfig("txK must be between 1 and 7"));
		}

		if self.ack_time_min > self.ack_time_init || self.ack_time_init > self.ack_time_max {
			return Err(Error::InvalidConfig("ack timing must satisfy ackTimeMin <= ackTimeInit <= ackTimeMax"));
		}

		if self.nr_low_limit > self.nr_high_limit {
			return Err(Error::InvalidConfig("nrLowLimit must not exceed nrHighLimit"));
		}

		Ok(())
	}
}
