//! CLI command implementations

pub mod associations;
pub mod disks;
pub mod networks;
pub mod resolve;
