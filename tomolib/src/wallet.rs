//! Wallet side of the library: token transfers, contract access and the on-disk snapshot

pub mod disk;
pub mod send;
pub mod traits;
