#![forbid(unsafe_code)]
use std::{
    fmt,
    io::{self, Error, ErrorKind},
    num::NonZeroU64,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, RwLock},
};

use log::LevelFilter;
use log4rs::{
    append::rolling_file::{
        policy::compound::{
            roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
        },
        RollingFileAppender,
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use tomo_units::PRIVACY_DECIMALS;

pub const DEFAULT_RPC_PORT: u16 = 8545;
pub const DEFAULT_WALLET_NAME: &str = "tomo-privacy-wallet.json";
pub const DEFAULT_LOGFILE_NAME: &str = "tomo-wallet.debug.log";
/// Number of transaction indices below the last known one that a history scan looks at
pub const DEFAULT_HISTORY_WINDOW: u64 = 48;
/// Gas limit attached to standard token transfers
pub const DEFAULT_STANDARD_FEE_LIMIT: u64 = 50_000;

/// Parses a user supplied server address, filling in the scheme and the default port.
///
/// `None` falls back to the mainnet node.
pub fn construct_rpc_uri(server: Option<String>) -> Result<http::Uri, http::uri::InvalidUri> {
    match server {
        Some(s) => {
            let mut s = if s.starts_with("http") {
                s
            } else {
                "http://".to_string() + &s
            };
            let uri: http::Uri = s.parse()?;
            if uri.port().is_none() {
                s += &format!(":{DEFAULT_RPC_PORT}");
            }
            s
        }
        None => ChainType::Mainnet.rpc_server().host.to_string(),
    }
    .parse()
}

/// Connection presets of a public node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpcServer {
    pub host: &'static str,
    pub ws: &'static str,
    pub network_id: u64,
    pub hd_path: &'static str,
}

/// Configuration needed to run a privacy wallet against one network.
#[derive(Clone, Debug)]
pub struct TomoConfig {
    pub rpc_uri: Arc<RwLock<http::Uri>>,
    pub chain: ChainType,
    /// The directory where the wallet snapshot and logfiles will be created. By default, this will
    /// be in ~/.tomowallet on Linux.
    pub wallet_dir: Option<PathBuf>,
    /// The filename of the privacy wallet snapshot. This will be created in the `wallet_dir`.
    pub wallet_name: PathBuf,
    /// The filename of the logfile. This will be created in the `wallet_dir`.
    pub logfile_name: PathBuf,
    pub history_window: NonZeroU64,
    pub standard_fee_limit: u64,
    pub privacy_decimals: u32,
}

impl TomoConfig {
    // Create an unconnected (to any server) config to test for local wallet etc...
    pub fn create_unconnected(chain: ChainType, dir: Option<PathBuf>) -> TomoConfig {
        TomoConfig {
            rpc_uri: Arc::new(RwLock::new(http::Uri::default())),
            chain,
            wallet_dir: dir,
            wallet_name: DEFAULT_WALLET_NAME.into(),
            logfile_name: DEFAULT_LOGFILE_NAME.into(),
            history_window: NonZeroU64::new(DEFAULT_HISTORY_WINDOW)
                .unwrap_or(NonZeroU64::MIN),
            standard_fee_limit: DEFAULT_STANDARD_FEE_LIMIT,
            privacy_decimals: PRIVACY_DECIMALS,
        }
    }

    /// Config pointed at the preset node of `chain`.
    pub fn create_for_chain(chain: ChainType, dir: Option<PathBuf>) -> io::Result<TomoConfig> {
        let config = Self::create_unconnected(chain, dir);
        let uri = chain
            .rpc_server()
            .host
            .parse()
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
        config.set_rpc_uri(uri);
        Ok(config)
    }

    pub fn set_data_dir(&mut self, dir_str: String) {
        self.wallet_dir = Some(PathBuf::from(dir_str));
    }

    /// Build the Logging config
    pub fn get_log_config(&self) -> io::Result<Config> {
        let window_size = 3; // log0, log1, log2
        let fixed_window_roller = FixedWindowRoller::builder()
            .build("tomo-wallet-log{}", window_size)
            .map_err(|e| Error::new(ErrorKind::Other, format!("{}", e)))?;
        let size_limit = 5 * 1024 * 1024; // 5MB as max log file size to roll
        let size_trigger = SizeTrigger::new(size_limit);
        let compound_policy =
            CompoundPolicy::new(Box::new(size_trigger), Box::new(fixed_window_roller));

        Config::builder()
            .appender(
                Appender::builder()
                    .filter(Box::new(ThresholdFilter::new(LevelFilter::Info)))
                    .build(
                        "logfile",
                        Box::new(
                            RollingFileAppender::builder()
                                .encoder(Box::new(PatternEncoder::new("{d} {l}::{m}{n}")))
                                .build(self.get_log_path()?, Box::new(compound_policy))?,
                        ),
                    ),
            )
            .build(
                Root::builder()
                    .appender("logfile")
                    .build(LevelFilter::Debug),
            )
            .map_err(|e| Error::new(ErrorKind::Other, format!("{}", e)))
    }

    /// Resolves (and creates) the wallet directory
    pub fn get_wallet_dir(&self) -> io::Result<Box<Path>> {
        let mut data_location = match &self.wallet_dir {
            // If there's some --data-dir path provided, use it
            Some(dir) => dir.clone(),
            None => {
                let mut location = dirs::home_dir().ok_or_else(|| {
                    Error::new(ErrorKind::NotFound, "Couldn't determine home directory!")
                })?;
                location.push(".tomowallet");
                location
            }
        };
        if self.wallet_dir.is_none() {
            match &self.chain {
                ChainType::Testnet => data_location.push("testnet"),
                ChainType::Mainnet => {}
            };
        }

        std::fs::create_dir_all(&data_location).map_err(|e| {
            log::error!("Couldn't create wallet directory {:?}: {}", data_location, e);
            e
        })?;

        Ok(data_location.into_boxed_path())
    }

    pub fn get_rpc_uri(&self) -> http::Uri {
        match self.rpc_uri.read() {
            Ok(uri) => uri.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_rpc_uri(&self, uri: http::Uri) {
        match self.rpc_uri.write() {
            Ok(mut current) => *current = uri,
            Err(poisoned) => *poisoned.into_inner() = uri,
        }
    }

    pub fn get_wallet_path(&self) -> io::Result<Box<Path>> {
        let mut wallet_location = self.get_wallet_dir()?.into_path_buf();
        wallet_location.push(&self.wallet_name);

        Ok(wallet_location.into_boxed_path())
    }

    pub fn wallet_exists(&self) -> bool {
        self.get_wallet_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    pub fn get_log_path(&self) -> io::Result<Box<Path>> {
        let mut log_path = self.get_wallet_dir()?.into_path_buf();
        log_path.push(&self.logfile_name);

        Ok(log_path.into_boxed_path())
    }

    pub fn network_id(&self) -> u64 {
        self.chain.rpc_server().network_id
    }

    pub fn hd_path(&self) -> &'static str {
        self.chain.rpc_server().hd_path
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainType {
    Mainnet,
    Testnet,
}

impl ChainType {
    pub fn rpc_server(&self) -> RpcServer {
        match self {
            ChainType::Mainnet => RpcServer {
                host: "http://206.189.39.242:8545",
                ws: "ws://206.189.39.242:8546",
                network_id: 88,
                hd_path: "m/44'/889'/0'/0/",
            },
            ChainType::Testnet => RpcServer {
                host: "https://testnet.tomochain.com",
                ws: "wss://testnet.tomochain.com",
                network_id: 89,
                hd_path: "m/44'/889'/0'/0/",
            },
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ChainType::*;
        let name = match self {
            Mainnet => "mainnet",
            Testnet => "testnet",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ChainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" | "main" => Ok(ChainType::Mainnet),
            "testnet" | "test" => Ok(ChainType::Testnet),
            _ => Err(format!(
                "Invalid chain '{s}'. Expected one of: mainnet, testnet"
            )),
        }
    }
}
