//! Build → sign → broadcast orchestration.
//!
//! # States
//! ```text
//! Funded(inputs, outputs, contract) → Built(descriptor) → Signed(signed) → TxId
//! ```
//!
//! Each phase is one blocking round trip to the node. A failing phase halts
//! the flow in its last good state and surfaces the error unchanged; there
//! is nothing to roll back locally except an output reservation, which is
//! released when the state holding it is dropped.

use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

use crate::error::{WalletError, WalletResult};
use crate::ledger::gateway::SIGN_PATH;
use crate::ledger::types::{CreateRawTransaction, LedgerError};
use crate::observability::metrics;
use crate::transaction::amount::Amount;
use crate::transaction::contract::{ContractAction, ContractRequest};
use crate::transaction::reservation::{NoReservations, OutputReservations, ReservationGuard};
use crate::transaction::selector::CoinSelector;
use crate::transaction::types::{
    DeployReceipt, OutPoint, OutputTarget, SignedTransaction, SpendableOutput, TxId,
    UnsignedTransaction,
};
use crate::wallet::WalletContext;

/// Inputs and outputs chosen for a transaction, not yet sent to the node.
#[derive(Debug)]
pub struct Funded {
    inputs: Vec<OutPoint>,
    outputs: Vec<OutputTarget>,
    contract: ContractRequest,
    claim: ReservationGuard,
}

impl Funded {
    pub fn inputs(&self) -> &[OutPoint] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputTarget] {
        &self.outputs
    }

    pub fn contract(&self) -> &ContractRequest {
        &self.contract
    }
}

/// A node-encoded transaction awaiting signature.
#[derive(Debug)]
pub struct Built {
    unsigned: UnsignedTransaction,
    claim: ReservationGuard,
}

impl Built {
    pub fn unsigned(&self) -> &UnsignedTransaction {
        &self.unsigned
    }
}

/// A signed transaction awaiting broadcast.
#[derive(Debug)]
pub struct Signed {
    signed: SignedTransaction,
    contract_address: String,
    claim: ReservationGuard,
}

impl Signed {
    pub fn transaction(&self) -> &SignedTransaction {
        &self.signed
    }

    /// Contract address the node assigned when the transaction was built.
    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }
}

/// Transaction engine bound to one wallet.
#[derive(Clone)]
pub struct TransactionPipeline {
    context: Arc<WalletContext>,
    reservations: Arc<dyn OutputReservations>,
}

impl TransactionPipeline {
    /// Pipeline without cross-flow coordination.
    pub fn new(context: WalletContext) -> Self {
        Self::with_reservations(context, Arc::new(NoReservations))
    }

    /// Pipeline that skips and claims outputs through `reservations`.
    pub fn with_reservations(
        context: WalletContext,
        reservations: Arc<dyn OutputReservations>,
    ) -> Self {
        Self {
            context: Arc::new(context),
            reservations,
        }
    }

    pub fn context(&self) -> &WalletContext {
        &self.context
    }

    /// Current spendable outputs of the owner address.
    pub async fn list_spendable(&self) -> WalletResult<Vec<SpendableOutput>> {
        let owner = self.context.owner_address();
        Ok(self.context.gateway().list_utxos(owner).await?)
    }

    /// Send `amount` to `destination`, funding it from as many outputs as needed.
    pub async fn transfer(
        &self,
        destination: &str,
        amount: Amount,
        fee: Option<Amount>,
    ) -> WalletResult<TxId> {
        let fee = fee.unwrap_or(self.context.default_fee());
        let span = tracing::info_span!("pipeline", flow = "transfer", %destination, %amount, %fee);

        let result: WalletResult<TxId> = async {
            let funded = self.fund_transfer(destination, amount, fee).await?;
            let (txid, _) = self.complete(funded).await?;
            Ok(txid)
        }
        .instrument(span)
        .await;

        metrics::record_pipeline("transfer", result.is_ok());
        result
    }

    /// Deploy a contract; the node assigns its address at build time.
    pub async fn deploy(
        &self,
        contract: ContractRequest,
        fee: Option<Amount>,
    ) -> WalletResult<DeployReceipt> {
        expect_action(&contract, ContractAction::Deploy)?;
        let fee = fee.unwrap_or(self.context.default_fee());
        let span = tracing::info_span!("pipeline", flow = "deploy", %fee);

        let result: WalletResult<DeployReceipt> = async {
            let funded = self.fund_contract(contract, fee).await?;
            let (txid, contract_address) = self.complete(funded).await?;
            tracing::info!(%txid, %contract_address, "Contract deployed");
            Ok(DeployReceipt {
                txid,
                contract_address,
            })
        }
        .instrument(span)
        .await;

        metrics::record_pipeline("deploy", result.is_ok());
        result
    }

    /// Invoke a deployed contract.
    pub async fn call(&self, contract: ContractRequest, fee: Option<Amount>) -> WalletResult<TxId> {
        expect_action(&contract, ContractAction::Call)?;
        let fee = fee.unwrap_or(self.context.default_fee());
        let span = tracing::info_span!("pipeline", flow = "call", contract = %contract.address, %fee);

        let result: WalletResult<TxId> = async {
            let funded = self.fund_contract(contract, fee).await?;
            let (txid, _) = self.complete(funded).await?;
            Ok(txid)
        }
        .instrument(span)
        .await;

        metrics::record_pipeline("call", result.is_ok());
        result
    }

    /// Read-only contract query. Empty `args` are sent as `[""]`.
    pub async fn contract_message(&self, address: &str, args: &[String]) -> WalletResult<Value> {
        let default_args = [String::new()];
        let args = if args.is_empty() { &default_args[..] } else { args };
        Ok(self.context.gateway().contract_message(address, args).await?)
    }

    /// Select inputs covering `amount + fee` and lay out change and destination outputs.
    pub async fn fund_transfer(
        &self,
        destination: &str,
        amount: Amount,
        fee: Amount,
    ) -> WalletResult<Funded> {
        let snapshot = self.list_spendable().await?;
        let (selection, claim) = self.reserve(snapshot, |candidates| {
            let selection = CoinSelector::new().select_many(candidates, amount, fee)?;
            let outpoints: Vec<OutPoint> =
                selection.inputs.iter().map(SpendableOutput::outpoint).collect();
            Ok((selection, outpoints))
        })?;

        let outputs = selection.outputs(self.context.owner_address(), destination, amount);
        check_balance(selection.total, &outputs, fee)?;

        tracing::info!(
            inputs = selection.inputs.len(),
            total = %selection.total,
            change = %selection.change,
            "Transfer funded"
        );

        Ok(Funded {
            inputs: selection.inputs.iter().map(SpendableOutput::outpoint).collect(),
            outputs,
            contract: ContractRequest::transfer_placeholder(),
            claim,
        })
    }

    /// Select a single output worth more than `fee` to carry a contract action.
    pub async fn fund_contract(&self, contract: ContractRequest, fee: Amount) -> WalletResult<Funded> {
        let contract = contract.validated()?;
        let snapshot = self.list_spendable().await?;

        let (utxo, claim) = self.reserve(snapshot, |candidates| {
            let utxo = CoinSelector::new().select_one(candidates, fee)?;
            let outpoints = vec![utxo.outpoint()];
            Ok((utxo, outpoints))
        })?;

        let amount = utxo.amount.checked_sub(fee).ok_or_else(|| {
            WalletError::Invariant(format!("output {} does not cover fee {}", utxo.amount, fee))
        })?;
        let address = if utxo.address.is_empty() {
            self.context.owner_address().to_string()
        } else {
            utxo.address.clone()
        };
        let outputs = vec![OutputTarget { address, amount }];
        check_balance(utxo.amount, &outputs, fee)?;

        tracing::info!(input = %utxo.outpoint(), amount = %utxo.amount, "Contract action funded");

        Ok(Funded {
            inputs: vec![utxo.outpoint()],
            outputs,
            contract,
            claim,
        })
    }

    /// Phase 1: have the node encode the funded transaction.
    pub async fn build(&self, funded: Funded) -> WalletResult<Built> {
        let Funded {
            inputs,
            outputs,
            contract,
            claim,
        } = funded;
        let request = CreateRawTransaction {
            inputs,
            outputs,
            contract: Some(contract),
        };
        let unsigned = self.context.gateway().create_raw_transaction(&request).await?;
        tracing::debug!(phase = "build", "Transaction built");
        Ok(Built { unsigned, claim })
    }

    /// Phase 2: have the node sign the built transaction.
    pub async fn sign(&self, built: Built) -> WalletResult<Signed> {
        let Built { unsigned, claim } = built;
        let response = self
            .context
            .gateway()
            .sign_raw_transaction(&unsigned.hex, self.context.credential())
            .await?;

        if !response.complete {
            tracing::warn!(phase = "sign", "Node reported incomplete signature");
            return Err(WalletError::SigningIncomplete);
        }
        if response.hex.is_empty() {
            return Err(LedgerError::Decode {
                path: SIGN_PATH.to_string(),
                reason: "complete signature without hex".to_string(),
            }
            .into());
        }

        tracing::debug!(phase = "sign", "Transaction signed");
        Ok(Signed {
            signed: SignedTransaction::new(response.hex),
            contract_address: unsigned.contract_address,
            claim,
        })
    }

    /// Phase 3: submit the signed transaction. Consumes it so it cannot be resent.
    pub async fn broadcast(&self, signed: Signed) -> WalletResult<TxId> {
        let Signed { signed, claim, .. } = signed;
        let hex = signed.into_hex();
        let txid = self.context.gateway().send_raw_transaction(&hex).await?;
        claim.commit();
        tracing::info!(phase = "broadcast", %txid, "Transaction broadcast");
        Ok(txid)
    }

    async fn complete(&self, funded: Funded) -> WalletResult<(TxId, String)> {
        let built = self.build(funded).await?;
        let signed = self.sign(built).await?;
        let contract_address = signed.contract_address().to_string();
        let txid = self.broadcast(signed).await?;
        Ok((txid, contract_address))
    }

    /// Run `select` over unreserved candidates and claim what it picked,
    /// retrying when another flow claims an output first.
    fn reserve<T, F>(
        &self,
        snapshot: Vec<SpendableOutput>,
        mut select: F,
    ) -> WalletResult<(T, ReservationGuard)>
    where
        F: FnMut(Vec<SpendableOutput>) -> WalletResult<(T, Vec<OutPoint>)>,
    {
        let attempts = snapshot.len() + 1;
        for _ in 0..attempts {
            let candidates = self.reservations.available(snapshot.clone());
            let (picked, outpoints) = select(candidates)?;
            if let Some(id) = self.reservations.try_reserve(&outpoints) {
                let guard = ReservationGuard::new(self.reservations.clone(), id, outpoints);
                return Ok((picked, guard));
            }
            tracing::debug!("Selected output claimed concurrently, reselecting");
        }
        tracing::warn!(attempts, "Giving up on reservation after repeated conflicts");
        Err(WalletError::ReservationContention { attempts })
    }
}

impl std::fmt::Debug for TransactionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionPipeline")
            .field("owner_address", &self.context.owner_address())
            .field("gateway", self.context.gateway())
            .finish()
    }
}

fn expect_action(contract: &ContractRequest, action: ContractAction) -> WalletResult<()> {
    if contract.action != action {
        return Err(WalletError::InvalidContract(format!(
            "expected {:?} payload, got {:?}",
            action, contract.action
        )));
    }
    Ok(())
}

/// Inputs must equal outputs plus fee: no value created or destroyed.
fn check_balance(inputs: Amount, outputs: &[OutputTarget], fee: Amount) -> WalletResult<()> {
    let spent = Amount::checked_sum(outputs.iter().map(|o| o.amount))
        .and_then(|total| total.checked_add(fee));
    if spent != Some(inputs) {
        return Err(WalletError::Invariant(format!(
            "inputs {} do not balance outputs plus fee {}",
            inputs, fee
        )));
    }
    Ok(())
}
