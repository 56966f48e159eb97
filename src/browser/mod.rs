pub mod driver;
pub mod protocol;
pub mod remote;
pub mod session;
pub mod snapshot_driver;
