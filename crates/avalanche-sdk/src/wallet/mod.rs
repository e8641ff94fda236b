//! Chain-flavored wallet facades.
pub mod p;
pub mod x;

use std::{
    fmt,
    sync::{Arc, Mutex},
    time::SystemTime,
};

use crate::{
    constants,
    errors::{Error, Result},
    ids::{self, short},
    jsonrpc::client::p as client_p,
    key,
};

/// A wallet bound to one network. Network-wide facts (the AVAX asset id,
/// the fee schedule, the chain ids) are resolved once at build time and
/// never refreshed; build a new wallet to reset them.
#[derive(Debug, Clone)]
pub struct Wallet<T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone> {
    pub keychain: key::secp256k1::keychain::Keychain<T>,

    /// Base HTTP URLs without RPC endpoint path.
    pub base_http_urls: Vec<String>,
    pub base_http_url_cursor: Arc<Mutex<usize>>, // to roundrobin

    pub network_id: u32,
    pub network_name: String,
    pub hrp: String,

    pub x_address: String,
    pub p_address: String,
    pub short_address: short::Id,

    pub blockchain_id_x: ids::Id,
    /// The platform chain id is fixed to the empty id; it is never aliased.
    pub blockchain_id_p: ids::Id,

    pub avax_asset_id: ids::Id,

    /// Fee that is burned by every non-state-creating transaction.
    pub tx_fee: u64,
    /// Transaction fee to create a new asset.
    pub create_asset_tx_fee: u64,
    /// Transaction fee for adding a primary network staker.
    pub add_staker_fee: u64,
}

impl<T> fmt::Display for Wallet<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "http_rpcs: {:?}", self.base_http_urls)?;
        writeln!(f, "network_id: {}", self.network_id)?;
        writeln!(f, "network_name: {}", self.network_name)?;
        writeln!(f, "x_address: {}", self.x_address)?;
        writeln!(f, "p_address: {}", self.p_address)?;
        writeln!(f, "blockchain_id_x: {}", self.blockchain_id_x)?;
        writeln!(f, "avax_asset_id: {}", self.avax_asset_id)?;
        writeln!(f, "tx_fee: {}", self.tx_fee)
    }
}

impl<T> Wallet<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    /// Picks one endpoint in roundrobin, and updates the cursor for next calls.
    pub fn pick_base_http_url(&self) -> (usize, String) {
        let mut idx = self.base_http_url_cursor.lock().unwrap();

        let picked = *idx;
        let http_rpc = self.base_http_urls[picked].clone();
        *idx = (picked + 1) % self.base_http_urls.len();

        log::debug!("picked base http URL {http_rpc} at index {picked}");
        (picked, http_rpc)
    }

    /// The wallet's bech32 addresses for every chain, as the RPC expects.
    pub fn hrp_addresses(&self, chain_alias: &str) -> Result<Vec<String>> {
        let mut addrs = Vec::with_capacity(self.keychain.keys.len());
        for k in self.keychain.keys.iter() {
            addrs.push(
                k.short_address()?
                    .to_hrp_address(chain_alias, &self.hrp)?,
            );
        }
        Ok(addrs)
    }

    /// The current Unix time, the default "as_of" for coin selection.
    pub fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("system clock before the epoch")
            .as_secs()
    }
}

/// Resolves the wallet's network facts and caches them in the facade.
#[derive(Debug, Clone)]
pub struct Builder<T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone> {
    pub keys: Vec<T>,
    pub base_http_urls: Vec<String>,
    pub network_id: u32,
    pub blockchain_id_x: ids::Id,
}

impl<T> Builder<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    pub fn new(key: T, base_http_url: &str) -> Self {
        Self {
            keys: vec![key],
            base_http_urls: vec![String::from(base_http_url)],
            network_id: constants::DEFAULT_CUSTOM_NETWORK_ID,
            blockchain_id_x: ids::Id::empty(),
        }
    }

    #[must_use]
    pub fn keys(mut self, keys: Vec<T>) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub fn base_http_urls(mut self, urls: Vec<String>) -> Self {
        self.base_http_urls = urls;
        self
    }

    #[must_use]
    pub fn network_id(mut self, network_id: u32) -> Self {
        self.network_id = network_id;
        self
    }

    #[must_use]
    pub fn blockchain_id_x(mut self, blockchain_id_x: ids::Id) -> Self {
        self.blockchain_id_x = blockchain_id_x;
        self
    }

    /// Discovers the AVAX asset id from the node and freezes the facade.
    pub async fn build(self) -> Result<Wallet<T>> {
        if self.keys.is_empty() {
            return Err(Error::InvalidInput {
                message: "wallet needs at least one key".to_string(),
            });
        }
        if self.base_http_urls.is_empty() {
            return Err(Error::InvalidInput {
                message: "wallet needs at least one endpoint".to_string(),
            });
        }

        let network_name = constants::NETWORK_ID_TO_NETWORK_NAME
            .get(&self.network_id)
            .copied()
            .unwrap_or("custom")
            .to_string();
        let hrp = constants::hrp_for_network(self.network_id).to_string();

        let keychain = key::secp256k1::keychain::Keychain::new(self.keys);
        let short_address = keychain.keys[0].short_address()?;
        let x_address =
            short_address.to_hrp_address(constants::X_CHAIN_ALIAS, &hrp)?;
        let p_address =
            short_address.to_hrp_address(constants::P_CHAIN_ALIAS, &hrp)?;

        // one-time discovery; the staking asset IS the AVAX asset
        let resp = client_p::get_staking_asset_id(&self.base_http_urls[0]).await?;
        if let Some(e) = resp.error {
            return Err(e.into_error());
        }
        let avax_asset_id = resp
            .result
            .ok_or_else(|| Error::API {
                message: "no result for getStakingAssetID".to_string(),
                retryable: true,
            })?
            .asset_id;
        log::info!("discovered AVAX asset id {avax_asset_id}");

        Ok(Wallet {
            keychain,
            base_http_urls: self.base_http_urls,
            base_http_url_cursor: Arc::new(Mutex::new(0)),
            network_id: self.network_id,
            network_name,
            hrp,
            x_address,
            p_address,
            short_address,
            blockchain_id_x: self.blockchain_id_x,
            blockchain_id_p: ids::Id::empty(),
            avax_asset_id,
            tx_fee: constants::tx_fee_for_network(self.network_id),
            create_asset_tx_fee: constants::NETWORK_ID_TO_CREATE_ASSET_TX_FEE
                .get(&self.network_id)
                .copied()
                .unwrap_or_else(|| constants::tx_fee_for_network(self.network_id)),
            add_staker_fee: 0,
        })
    }
}
