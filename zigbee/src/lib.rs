pub mod ezsp;
pub mod interpan;
pub mod gp;
