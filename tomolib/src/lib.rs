#![forbid(unsafe_code)]
//! Privacy wallet library: keeps a privacy wallet in step with the chain and moves tokens.
//!
//! [`privacy_client::PrivacyClient`] is what an application drives. The engines underneath live
//! in `tomo-sync` (outputs and history) and [`wallet::send`] (token transfers).

pub mod error;
pub mod privacy_client;
pub mod wallet;

use std::io::{self, Error, ErrorKind};

use tomoconfig::TomoConfig;

/// Routes `log` output into the rolling logfile of `config`'s wallet directory
pub fn init_logging(config: &TomoConfig) -> io::Result<()> {
    log4rs::init_config(config.get_log_config()?)
        .map(|_handle| ())
        .map_err(|e| Error::new(ErrorKind::AlreadyExists, format!("{}", e)))
}
