use zigbee::ezsp::EzspStatus;

//What the host should do about an error the NCP reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorAction {
	LogOnly,
	LogAndRequestReset,
}

//A reset does not help with ignored decryption failures or transient
//backpressure, so those codes never restart the stack. Everything else is
//treated as a fatal stack condition.
pub fn classify(status: &EzspStatus) -> ErrorAction {
	match status {
		EzspStatus::EzspErrorSecurityParametersInvalid
		| EzspStatus::EzspErrorOverflow
		| EzspStatus::EzspErrorQueueFull => ErrorAction::LogOnly,
		_ => ErrorAction::LogAndRequestReset,
	}
}
