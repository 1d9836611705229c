use crate::constants::{
    BALANCE_CACHE_TTL, CONTRACT_MODULE, DEFAULT_BALANCE_POLL_INTERVAL, DEFAULT_EVENT_QUERY_LIMIT, UNCONFIGURED_PACKAGE,
};
use dotenv::dotenv;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use utoipa::ToSchema;

const TESTNET_PACKAGE: &str = "0xad3ce58354518721aa95b3d99ba0fc430fd7ab618f5c38095835dfb5bb1201d4";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Devnet,
    Testnet,
    Mainnet,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }

    pub fn fullnode_url(&self) -> String {
        format!("https://fullnode.{}.sui.io:443", self.name())
    }

    /// Deployed `gathrfi` package; only testnet has one.
    pub fn package(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_PACKAGE,
            Network::Devnet | Network::Mainnet => UNCONFIGURED_PACKAGE,
        }
    }

    pub fn usdc_coin_type(&self) -> String {
        match self {
            Network::Testnet => format!("{}::mock_usdc::MOCK_USDC", TESTNET_PACKAGE),
            Network::Devnet | Network::Mainnet => UNCONFIGURED_PACKAGE.to_string(),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(format!("unknown network {}", other)),
        }
    }
}

/// Per-network contract addresses and fullnode endpoint.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct NetworkConfig {
    pub network: Network,
    pub rpc_url: String,
    pub package: String,
    pub coin_type: String,
}

impl NetworkConfig {
    pub fn for_network(network: Network) -> Self {
        NetworkConfig {
            network,
            rpc_url: network.fullnode_url(),
            package: network.package().to_string(),
            coin_type: network.usdc_coin_type(),
        }
    }

    pub fn is_configured(&self) -> bool {
        let package = self.package.trim();
        !package.is_empty() && package != UNCONFIGURED_PACKAGE
    }

    pub fn event_type(&self, event: &str) -> String {
        crate::core::models::event::event_type(&self.package, event)
    }

    pub fn module(&self) -> String {
        format!("{}::{}", self.package, CONTRACT_MODULE)
    }
}

#[derive(Clone, Debug)]
pub struct ServiceSettings {
    pub network: NetworkConfig,
    pub event_query_limit: usize,
    /// Pages of each event type to scan per listing.
    pub event_query_pages: usize,
    pub balance_cache_ttl: Duration,
}

impl ServiceSettings {
    pub fn new(network: NetworkConfig) -> Self {
        ServiceSettings {
            network,
            event_query_limit: DEFAULT_EVENT_QUERY_LIMIT,
            event_query_pages: 1,
            balance_cache_ttl: BALANCE_CACHE_TTL,
        }
    }
}

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub wallet_url: Option<String>,
    pub balance_poll_interval: Duration,
    pub service: ServiceSettings,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("wallet_url", &self.wallet_url.as_ref().map(|_| "<redacted>"))
            .field("balance_poll_interval", &self.balance_poll_interval)
            .field("service", &self.service)
            .finish()
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        let network = env_parse::<Network>("SUI_NETWORK").unwrap_or(Network::Testnet);
        let mut network_config = NetworkConfig::for_network(network);
        if let Ok(url) = env::var("SUI_RPC_URL") {
            network_config.rpc_url = url;
        }
        if let Ok(package) = env::var("GATHRFI_PACKAGE") {
            network_config.package = package;
        }
        if let Ok(coin_type) = env::var("USDC_COIN_TYPE") {
            network_config.coin_type = coin_type;
        }

        let mut service = ServiceSettings::new(network_config);
        service.event_query_limit = env_parse("EVENT_QUERY_LIMIT").unwrap_or(DEFAULT_EVENT_QUERY_LIMIT);
        service.event_query_pages = env_parse::<usize>("EVENT_QUERY_PAGES").unwrap_or(1).max(1);

        Self {
            port: env_parse("PORT").unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            wallet_url: env::var("WALLET_URL").ok().filter(|u| !u.trim().is_empty()),
            balance_poll_interval: env_parse::<u64>("BALANCE_POLL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_BALANCE_POLL_INTERVAL),
            service,
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
