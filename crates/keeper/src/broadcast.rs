//! Delegated-execution transactions.
//!
//! The whole batch travels as one `MsgExec` signed by the keeper, so every
//! granter's withdrawals and creations land or fail together.

use async_trait::async_trait;
use flood_types::proto::authz::MsgExec;
use flood_types::proto::tx::mode_info::{Single, Sum};
use flood_types::proto::tx::{AuthInfo, Fee, ModeInfo, SignDoc, SignerInfo, TxBody, TxRaw};
use flood_types::proto::Any;
use flood_types::{FloodError, FloodResult, RebalanceBatch, MSG_EXEC_TYPE_URL, SIGN_MODE_DIRECT};
use prost::Message;
use tracing::{debug, info};

use crate::chain::{Broadcaster, TxReceipt};
use crate::config::GasConfig;
use crate::grpc::GrpcChainClient;
use crate::signer::LocalSigner;

/// Transaction body wrapping the batch in one `MsgExec`
pub fn exec_tx_body(grantee: &str, batch: &RebalanceBatch) -> TxBody {
    let exec = MsgExec {
        grantee: grantee.to_string(),
        msgs: batch.to_any_msgs(),
    };

    TxBody {
        messages: vec![Any {
            type_url: MSG_EXEC_TYPE_URL.to_string(),
            value: exec.encode_to_vec(),
        }],
        memo: String::new(),
        timeout_height: 0,
    }
}

/// Simulated gas scaled by the adjustment, rounded up
pub fn adjusted_gas(gas_used: u64, adjustment: f64) -> u64 {
    (gas_used as f64 * adjustment).ceil() as u64
}

/// Sign `body` for one signer in SIGN_MODE_DIRECT
pub fn sign_tx(
    signer: &LocalSigner,
    chain_id: &str,
    account_number: u64,
    sequence: u64,
    body: &TxBody,
    fee: Fee,
) -> TxRaw {
    let auth_info = AuthInfo {
        signer_infos: vec![SignerInfo {
            public_key: Some(signer.public_key_any()),
            mode_info: Some(ModeInfo {
                sum: Some(Sum::Single(Single { mode: SIGN_MODE_DIRECT })),
            }),
            sequence,
        }],
        fee: Some(fee),
    };

    let body_bytes = body.encode_to_vec();
    let auth_info_bytes = auth_info.encode_to_vec();
    let signature = signer.sign(&SignDoc {
        body_bytes: body_bytes.clone(),
        auth_info_bytes: auth_info_bytes.clone(),
        chain_id: chain_id.to_string(),
        account_number,
    });

    TxRaw {
        body_bytes,
        auth_info_bytes,
        signatures: vec![signature],
    }
}

/// Signs with a local key and broadcasts over gRPC
pub struct GrpcBroadcaster {
    client: GrpcChainClient,
    signer: LocalSigner,
    chain_id: String,
    gas: GasConfig,
}

impl GrpcBroadcaster {
    pub fn new(client: GrpcChainClient, signer: LocalSigner, chain_id: &str, gas: GasConfig) -> Self {
        Self {
            client,
            signer,
            chain_id: chain_id.to_string(),
            gas,
        }
    }

    fn fee(&self, gas_limit: u64) -> Fee {
        Fee {
            amount: vec![self.gas.fees.to_proto()],
            gas_limit,
            payer: String::new(),
            granter: String::new(),
        }
    }

    async fn gas_limit(&self, body: &TxBody, account_number: u64, sequence: u64) -> FloodResult<u64> {
        if let Some(limit) = self.gas.limit {
            return Ok(limit);
        }

        let probe = sign_tx(&self.signer, &self.chain_id, account_number, sequence, body, self.fee(0));
        let gas_info = self
            .client
            .simulate(probe.encode_to_vec())
            .await
            .map_err(|e| FloodError::broadcast_error(format!("simulation failed: {}", e), None, None))?;

        let limit = adjusted_gas(gas_info.gas_used, self.gas.adjustment);
        debug!(gas_used = gas_info.gas_used, gas_limit = limit, "Simulated gas");
        Ok(limit)
    }
}

#[async_trait]
impl Broadcaster for GrpcBroadcaster {
    async fn submit(&self, grantee: &str, batch: &RebalanceBatch) -> FloodResult<TxReceipt> {
        let account = self
            .client
            .account(grantee)
            .await
            .map_err(|e| FloodError::broadcast_error(format!("account lookup failed: {}", e), None, None))?;

        let body = exec_tx_body(grantee, batch);
        let gas_limit = self.gas_limit(&body, account.account_number, account.sequence).await?;
        let tx = sign_tx(
            &self.signer,
            &self.chain_id,
            account.account_number,
            account.sequence,
            &body,
            self.fee(gas_limit),
        );

        let response = self.client.broadcast(tx.encode_to_vec()).await?;
        if response.code != 0 {
            return Err(FloodError::broadcast_error(
                format!("{} (codespace {})", response.raw_log, response.codespace),
                Some(response.code),
                Some(response.txhash),
            ));
        }

        info!(tx_hash = %response.txhash, gas_limit, messages = batch.len(), "Broadcast rebalance batch");

        Ok(TxReceipt {
            tx_hash: response.txhash,
            gas_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_types::proto::cl::MsgWithdrawPosition;
    use flood_types::{AccountPlan, Coin, PositionInstruction, MSG_WITHDRAW_POSITION_TYPE_URL};

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn batch() -> RebalanceBatch {
        RebalanceBatch::from_plans([AccountPlan {
            account: "osmo1alice".to_string(),
            instructions: vec![PositionInstruction::Withdraw(MsgWithdrawPosition {
                position_id: 1,
                sender: "osmo1alice".to_string(),
                liquidity_amount: "10".to_string(),
            })],
        }])
    }

    #[test]
    fn test_exec_body_wraps_batch() {
        let body = exec_tx_body("osmo1keeper", &batch());
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].type_url, MSG_EXEC_TYPE_URL);

        let exec = MsgExec::decode(body.messages[0].value.as_slice()).unwrap();
        assert_eq!(exec.grantee, "osmo1keeper");
        assert_eq!(exec.msgs.len(), 1);
        assert_eq!(exec.msgs[0].type_url, MSG_WITHDRAW_POSITION_TYPE_URL);
    }

    #[test]
    fn test_adjusted_gas() {
        assert_eq!(adjusted_gas(100_000, 1.5), 150_000);
        assert_eq!(adjusted_gas(3, 1.5), 5);
        assert_eq!(adjusted_gas(0, 1.5), 0);
    }

    #[test]
    fn test_sign_tx_layout() {
        let signer = LocalSigner::from_hex(KEY).unwrap();
        let body = exec_tx_body("osmo1keeper", &batch());
        let fee = Fee {
            amount: vec![Coin::new("uosmo", 2_500).to_proto()],
            gas_limit: 250_000,
            payer: String::new(),
            granter: String::new(),
        };

        let tx = sign_tx(&signer, "osmosis-1", 7, 3, &body, fee);
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx.signatures[0].len(), 64);
        assert_eq!(TxBody::decode(tx.body_bytes.as_slice()).unwrap(), body);

        let auth_info = AuthInfo::decode(tx.auth_info_bytes.as_slice()).unwrap();
        assert_eq!(auth_info.signer_infos[0].sequence, 3);
        assert_eq!(auth_info.fee.as_ref().map(|f| f.gas_limit), Some(250_000));
        assert_eq!(
            auth_info.signer_infos[0].mode_info,
            Some(ModeInfo {
                sum: Some(Sum::Single(Single { mode: SIGN_MODE_DIRECT }))
            })
        );
    }
}
