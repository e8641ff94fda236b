//! X-chain wallet facade: build, sign, and issue in one call.
use crate::{
    avm::{builder::Builder, txs as avm_txs},
    constants,
    errors::{Error, Result},
    formatting, ids,
    ids::short,
    jsonrpc::client::x as client_x,
    key,
    txs::utxo::Utxo,
    txs::utxo_set::UtxoSet,
    wallet,
};

impl<T> wallet::Wallet<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    #[must_use]
    pub fn x(&self) -> X<T> {
        X {
            inner: self.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct X<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    pub inner: crate::wallet::Wallet<T>,
}

impl<T> X<T>
where
    T: key::secp256k1::ReadOnly + key::secp256k1::SignOnly + Clone,
{
    fn tx_builder<'a>(&self, utxo_set: &'a UtxoSet) -> Builder<'a> {
        Builder::new(
            self.inner.network_id,
            self.inner.blockchain_id_x,
            self.inner.avax_asset_id,
            self.inner.tx_fee,
            self.inner.create_asset_tx_fee,
            utxo_set,
        )
    }

    /// Fetches the current AVAX balance of the wallet owner.
    pub async fn balance(&self) -> Result<u64> {
        let resp = client_x::get_balance(
            &self.inner.pick_base_http_url().1,
            &self.inner.x_address,
            &self.inner.avax_asset_id.to_string(),
        )
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

    /// Fetches and decodes the wallet's X-chain UTXOs.
    /// TODO: paginate past the node's single-response limit
    pub async fn utxos(&self) -> Result<UtxoSet> {
        let addrs = self.inner.hrp_addresses(constants::X_CHAIN_ALIAS)?;
        let resp = client_x::get_utxos(&self.inner.pick_base_http_url().1, &addrs).await?;
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
        log::debug!("fetched {} X-chain UTXOs", set.len());
        Ok(set)
    }

    /// Fetches the atomic UTXOs exported to the X-chain by "source_chain".
    pub async fn atomic_utxos(&self, source_chain: &str) -> Result<Vec<Utxo>> {
        let addrs = self.inner.hrp_addresses(constants::X_CHAIN_ALIAS)?;
        let resp = client_x::get_atomic_utxos(
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

    /// Polls the transaction status until it is accepted or the timeout
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

            let resp = client_x::get_tx_status(
                &self.inner.pick_base_http_url().1,
                &tx_id.to_string(),
            )
            .await?;
            if let Some(result) = resp.result {
                if result.status == crate::jsonrpc::Status::Accepted {
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
        let resp = client_x::issue_tx(&self.inner.pick_base_http_url().1, &hex_tx).await?;
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

    /// Transfers "amount" AVAX to the receiver. Returns the issued tx id.
    pub async fn transfer(&self, receiver: short::Id, amount: u64) -> Result<ids::Id> {
        log::info!(
            "transferring {amount} nAVAX from {} to {receiver}",
            self.inner.short_address
        );
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder
            .base_tx(
                self.inner.avax_asset_id,
                amount,
                &[receiver],
                &senders,
                &[],
                None,
                self.inner.now_unix(),
                0,
                1,
            )?
            .ok_or_else(|| Error::InvalidInput {
                message: "nothing to transfer and nothing to burn".to_string(),
            })?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Creates a fungible or NFT asset from the initial states.
    pub async fn create_asset(
        &self,
        name: &str,
        symbol: &str,
        denomination: u8,
        initial_states: Vec<avm_txs::create_asset::InitialState>,
    ) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder.create_asset_tx(
            name,
            symbol,
            denomination,
            initial_states,
            &senders,
            &[],
            None,
            self.inner.now_unix(),
        )?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Mints NFTs of the asset's group to the receiver.
    pub async fn mint_nft(
        &self,
        asset_id: ids::Id,
        group_id: u32,
        payload: &[u8],
        receiver: short::Id,
    ) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, input_signers, op_signers) = builder.mint_nft_tx(
            asset_id,
            group_id,
            payload,
            &[receiver],
            &senders,
            &[],
            None,
            self.inner.now_unix(),
        )?;

        let input_keys = self.inner.keychain.keys_for_signers(&input_signers)?;
        let op_keys = self.inner.keychain.keys_for_signers(&op_signers)?;
        tx.sign(input_keys, op_keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Transfers the NFT held by "nft_utxo_id" to the receiver.
    pub async fn transfer_nft(
        &self,
        nft_utxo_id: &crate::txs::utxo::Id,
        receiver: short::Id,
    ) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, input_signers, op_signers) = builder.transfer_nft_tx(
            nft_utxo_id,
            &[receiver],
            &senders,
            &[],
            None,
            self.inner.now_unix(),
        )?;

        let input_keys = self.inner.keychain.keys_for_signers(&input_signers)?;
        let op_keys = self.inner.keychain.keys_for_signers(&op_signers)?;
        tx.sign(input_keys, op_keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Exports "amount" AVAX to the P-chain's atomic memory.
    pub async fn export_to_p(&self, amount: u64) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder.export_tx(
            self.inner.blockchain_id_p,
            self.inner.avax_asset_id,
            amount,
            &senders,
            &senders,
            &[],
            None,
            self.inner.now_unix(),
            0,
            1,
        )?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }

    /// Imports the UTXOs the P-chain exported to this chain.
    pub async fn import_from_p(&self) -> Result<ids::Id> {
        let utxo_set = self.utxos().await?;
        let atomic = self
            .atomic_utxos(constants::P_CHAIN_ALIAS)
            .await?;
        let builder = self.tx_builder(&utxo_set);

        let senders = self.inner.keychain.addresses();
        let (mut tx, signers) = builder.import_tx(
            self.inner.blockchain_id_p,
            &atomic,
            &senders,
            &senders,
            &[],
            None,
            self.inner.now_unix(),
            0,
            1,
        )?;

        let keys = self.inner.keychain.keys_for_signers(&signers)?;
        tx.sign(keys).await?;
        self.issue_signed(&tx.base_tx.metadata.as_ref().unwrap().tx_bytes_with_signatures)
            .await
    }
}
