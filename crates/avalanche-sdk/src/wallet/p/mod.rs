//! P-chain wallet facade: build, sign, and issue in one call.
use crate::{
    constants,
    errors::{Error, Result},
    formatting, ids,
    ids::node,
    jsonrpc::client::p as client_p,
    key,
    platformvm::builder::{self, Builder},
    txs::utxo::Utxo,
    txs::utxo_set::UtxoSet,
    wallet,
};

impl<T> wallet::Wallet<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    #[must_use]
    pub fn p(&self) -> P<T> {
        P {
            inner: self.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct P<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    pub inner: crate::wallet::Wallet<T>,
}

impl<T> P<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    fn tx_builder<'a>(&self, utxo_set: &'a UtxoSet) -> Builder<'a> {
        Builder::new(
            self.inner.network_id,
            // always the platform chain id, never an alias
            self.inner.blockchain_id_p,
            self.inner.avax_asset_id,
            self.inner.tx_fee,
            self.inner.add_staker_fee,
            utxo_set,
        )
    }

    /// Fetches the current AVAX balance of the wallet owner.
    pub async fn balance(&self) -> Result<u64> {
        let resp =
            client_p::get_balance(&self.inner.pick_base_http_url().1, &self.inner.p_address)
                .await?;
        if let Some(e) = resp.error {
            return Err(e.into_error());
        }
        Ok(resp
            .result
            .ok_or_else(|| Error::API {
                message: "no result for getBalance".to_string(),
                retryable: true,
            })?
            .balance)
    }

    /// Fetches and decodes the wallet's P-chain UTXOs.
    /// TODO: paginate past the node's single-response limit
    pub async fn utxos(&self) -> Result<UtxoSet> {
        let addrs = self.inner.hrp_addresses(constants::P_CHAIN_ALIAS)?;
        let resp = client_p::get_utxos(&self.inner.pick_base_http_url().1, &addrs).await?;
        if let Some(e) = resp.error {
            return Err(e.into_error());
        }
        let result = resp.result.ok_or_else(|| Error::API {
            message: "no result for getUTXOs".to_string(),
            retryable: true,
        })?;

        let mut set = UtxoSet::new();
        for s in result.utxos.unwrap_or_default().iter() {
            set.add(UtxoSet::parse_utxo(s)?, true);
        }
        log::debug!("fetched {} P-chain UTXOs", set.len());
        Ok(set)
    }

    /// Fetches the atomic UTXOs exported to the P-chain by "source_chain".
    pub async fn atomic_utxos(&self, source_chain: &str) -> Result<Vec<Utxo>> {
        let addrs = self.inner.hrp_addresses(constants::P_CHAIN_ALIAS)?;
        let resp = client_p::get_atomic_utxos(
            &self.inner.pick_base_http_url().1,
            &addrs,
            source_chain,
        )
        .await?;
        if let Some(e) = resp.error {
            return Err(e.into_error());
        }
        let result = resp.result.ok_or_else(|| Error::API {
            message: "no result for getUTXOs".to_string(),
            retryable: true,
        })?;

        let mut utxos = Vec::new();
        for s in result.utxos.unwrap_or_default().iter() {
            utxos.push(UtxoSet::parse_utxo(s)?);
        }
        Ok(utxos)
    }

    /// A staking window starting a minute from now and spanning the
    /// minimum duration with a few minutes of slack, so the window stays
    /// a subset of any validator it delegates behind.
    pub fn default_staking_window(&self) -> (u64, u64) {
        let now = chrono::Utc::now().timestamp() as u64;
        let start = now + 60;
        let end = start + constants::MIN_STAKE_DURATION + 5 * 60;
        (start, end)
    }

    /// Polls the transaction status until it is committed or the timeout
    /// elapses.
    pub async fn wait_for_acceptance(
        &self,
        tx_id: &ids::Id,
        poll_interval: std::time::Duration,
        poll_timeout: std::time::Duration,
    ) -> Result<()> {
        let start = tokio::time::Instant::now();
        loop {
            if start.elapsed() > poll_timeout {
                return Err(Error::API {
                    message: format!("{tx_id} not accepted in time"),
                    retryable: true,
                });
            }

            let resp = client_p::get_tx_status(
                &self.inner.pick_base_http_url().1,
                &tx_id.to_string(),
            )
            .await?;
            if let Some(result) = resp.result {
                if matches!(
                    result.status,
                    crate::jsonrpc::Status::Committed | crate::jsonrpc::Status::Accepted
                ) {
                    log::info!("{tx_id} successfully accepted");
                    return Ok(());
                }
                log::debug!("{tx_id} not accepted yet ({:?})", result.status);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn issue_signed(&self, signed_bytes: &[u8]) -> Result<ids::Id> {
        let hex_tx = formatting::encode_hex_with_checksum(signed_bytes);
        let resp = client_p::issue_tx(&self.inner.pick_base_http_url().1, &hex_tx).await?;
        if let Some(e) = resp.error {
            return Err(e.into_error());
        }
        let tx_id = resp
            .result
            .ok_or_else(|| Error::API {
                message: "no result for issueTx".to_string(),
                retryable: true,
            })?
            .tx_id;
        log::info!("{tx_id} successfully issued");
        Ok(tx_id)
    }

    /// Stakes "stake_amount" AVAX to validate as "node_id" over
    /// `[start_time, end_time]`, keeping "reward_fee_percent" of
    /// delegation rewards (API units, 0..=100).
    #[allow(clippy::too_many_arguments)]
    pub async fn add_validator(
        &self,
        node_id: node::Id,
        stake_amount: u64,
        start_time: u64,
        end_time: u64,
        reward_fee_percent: f64,
    ) -> Result<ids::Id> {
        log::info!(
            "adding validator {node_id} with {stake_amount} nAVAX at [{start_time}, {end_time}]"
        );
        let shares = builder::shares_from_percent(reward_fee_percent)?;
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder.add_validator_tx(
            node_id,
            start_time,
            end_time,
            stake_amount,
            &senders,
            shares,
            &senders,
            &[],
            self.inner.now_unix(),
        )?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Delegates "stake_amount" AVAX to the validator "node_id".
    pub async fn add_delegator(
        &self,
        node_id: node::Id,
        stake_amount: u64,
        start_time: u64,
        end_time: u64,
    ) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder.add_delegator_tx(
            node_id,
            start_time,
            end_time,
            stake_amount,
            &senders,
            &senders,
            &[],
            self.inner.now_unix(),
        )?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Adds "node_id" as a validator of the subnet with the sampling
    /// "weight". The caller supplies the subnet auth indices and the keys
    /// controlling them sign right after the fee inputs.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_subnet_validator(
        &self,
        node_id: node::Id,
        subnet_id: ids::Id,
        weight: u64,
        start_time: u64,
        end_time: u64,
        subnet_auth_indices: &[u32],
        subnet_auth_addresses: &[crate::ids::short::Id],
    ) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, mut signers) = builder.add_subnet_validator_tx(
            node_id,
            start_time,
            end_time,
            weight,
            subnet_id,
            subnet_auth_indices,
            &senders,
            &[],
            self.inner.now_unix(),
        )?;
        // the subnet auth credential follows the input credentials
        signers.push(Vec::from(subnet_auth_addresses));

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Exports "amount" AVAX to the X-chain's atomic memory.
    pub async fn export_to_x(&self, amount: u64) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder.export_tx(
            self.inner.blockchain_id_x,
            amount,
            &senders,
            &senders,
            &[],
            self.inner.now_unix(),
        )?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Imports the UTXOs the X-chain exported to this chain.
    pub async fn import_from_x(&self) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let atomic = self.atomic_utxos(constants::X_CHAIN_ALIAS).await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder.import_tx(
            self.inner.blockchain_id_x,
            &atomic,
            &senders,
            &senders,
            &[],
            self.inner.now_unix(),
        )?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }
}
