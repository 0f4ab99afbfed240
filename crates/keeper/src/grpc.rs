//! gRPC client for chain queries and transaction services.
//!
//! Uses tonic's generic unary client with prost messages from
//! `flood_types::proto`, so no generated service stubs are needed.

use std::time::Duration;

use async_trait::async_trait;
use flood_math::parse_decimal;
use flood_types::proto::auth::{BaseAccount, QueryAccountRequest, QueryAccountResponse};
use flood_types::proto::authz::{QueryGranteeGrantsRequest, QueryGranteeGrantsResponse};
use flood_types::proto::base::PageRequest;
use flood_types::proto::cl::{Pool, UserPositionsRequest, UserPositionsResponse};
use flood_types::proto::poolmanager::{PoolRequest, PoolResponse, SpotPriceRequest, SpotPriceResponse};
use flood_types::proto::tx::{
    BroadcastTxRequest, BroadcastTxResponse, GasInfo, SimulateRequest, SimulateResponse, TxResponse,
};
use flood_types::proto::wasm::{QuerySmartContractStateRequest, QuerySmartContractStateResponse};
use flood_types::{
    FloodError, FloodResult, Grant, Position, PowerMarket, BASE_ACCOUNT_TYPE_URL, BROADCAST_MODE_SYNC,
    CL_POOL_TYPE_URL, GRANT_PAGE_LIMIT,
};
use prost::Message;
use rust_decimal::Decimal;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::Request;
use tracing::debug;

use crate::chain::{power_market_from_responses, ChainQuery, CONFIG_QUERY, STATE_QUERY};

const GRANTEE_GRANTS: &str = "/cosmos.authz.v1beta1.Query/GranteeGrants";
const USER_POSITIONS: &str = "/osmosis.concentratedliquidity.v1beta1.Query/UserPositions";
const SPOT_PRICE: &str = "/osmosis.poolmanager.v1beta1.Query/SpotPrice";
const POOL: &str = "/osmosis.poolmanager.v1beta1.Query/Pool";
const SMART_CONTRACT_STATE: &str = "/cosmwasm.wasm.v1.Query/SmartContractState";
const ACCOUNT: &str = "/cosmos.auth.v1beta1.Query/Account";
const SIMULATE: &str = "/cosmos.tx.v1beta1.Service/Simulate";
const BROADCAST_TX: &str = "/cosmos.tx.v1beta1.Service/BroadcastTx";

/// gRPC connection to one node
#[derive(Debug, Clone)]
pub struct GrpcChainClient {
    endpoint: String,
    channel: Channel,
}

impl GrpcChainClient {
    /// Connect to a gRPC endpoint such as `http://localhost:9090`
    pub async fn connect(endpoint: &str) -> FloodResult<Self> {
        let channel = Endpoint::from_shared(endpoint.to_string())
            .map_err(|e| FloodError::transport(endpoint, e))?
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .connect()
            .await
            .map_err(|e| FloodError::transport(endpoint, e))?;

        debug!(endpoint, "Connected to gRPC endpoint");

        Ok(Self {
            endpoint: endpoint.to_string(),
            channel,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn unary<Req, Resp>(&self, path: &'static str, request: Req) -> FloodResult<Resp>
    where
        Req: Message + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready().await.map_err(|e| FloodError::transport(&self.endpoint, e))?;

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        grpc.unary(Request::new(request), PathAndQuery::from_static(path), codec)
            .await
            .map(tonic::Response::into_inner)
            .map_err(|status| FloodError::query_error(path, format!("{}: {}", status.code(), status.message())))
    }

    async fn smart_query(&self, contract: &str, query: &str) -> FloodResult<Vec<u8>> {
        let response: QuerySmartContractStateResponse = self
            .unary(
                SMART_CONTRACT_STATE,
                QuerySmartContractStateRequest {
                    address: contract.to_string(),
                    query_data: query.as_bytes().to_vec(),
                },
            )
            .await?;
        Ok(response.data)
    }

    /// Account number and sequence of `address`
    pub async fn account(&self, address: &str) -> FloodResult<BaseAccount> {
        let response: QueryAccountResponse = self
            .unary(ACCOUNT, QueryAccountRequest { address: address.to_string() })
            .await?;

        let any = response
            .account
            .ok_or_else(|| FloodError::query_error(ACCOUNT, format!("no account for {}", address)))?;
        if any.type_url != BASE_ACCOUNT_TYPE_URL {
            return Err(FloodError::decode_error(&any.type_url, "expected a base account"));
        }

        BaseAccount::decode(any.value.as_slice()).map_err(|e| FloodError::decode_error(BASE_ACCOUNT_TYPE_URL, e))
    }

    /// Gas estimate for a signed transaction
    pub async fn simulate(&self, tx_bytes: Vec<u8>) -> FloodResult<GasInfo> {
        let response: SimulateResponse = self.unary(SIMULATE, SimulateRequest { tx_bytes }).await?;
        response
            .gas_info
            .ok_or_else(|| FloodError::query_error(SIMULATE, "response carries no gas info"))
    }

    /// Broadcast in sync mode, returning once the transaction passed CheckTx
    pub async fn broadcast(&self, tx_bytes: Vec<u8>) -> FloodResult<TxResponse> {
        let response: BroadcastTxResponse = self
            .unary(
                BROADCAST_TX,
                BroadcastTxRequest {
                    tx_bytes,
                    mode: BROADCAST_MODE_SYNC,
                },
            )
            .await
            .map_err(|e| FloodError::broadcast_error(e, None, None))?;

        response
            .tx_response
            .ok_or_else(|| FloodError::broadcast_error("response carries no tx result", None, None))
    }
}

#[async_trait]
impl ChainQuery for GrpcChainClient {
    async fn grantee_grants(&self, grantee: &str) -> FloodResult<Vec<Grant>> {
        let mut grants = Vec::new();
        let mut next_key = Vec::new();

        loop {
            let response: QueryGranteeGrantsResponse = self
                .unary(
                    GRANTEE_GRANTS,
                    QueryGranteeGrantsRequest {
                        grantee: grantee.to_string(),
                        pagination: Some(PageRequest {
                            key: next_key,
                            limit: GRANT_PAGE_LIMIT,
                            ..Default::default()
                        }),
                    },
                )
                .await?;

            grants.extend(response.grants.into_iter().map(Grant::from));

            match response.pagination {
                Some(page) if !page.next_key.is_empty() => next_key = page.next_key,
                _ => break,
            }
        }

        debug!(grantee, count = grants.len(), "Fetched grants");
        Ok(grants)
    }

    async fn power_market(&self, contract: &str) -> FloodResult<PowerMarket> {
        let config = self.smart_query(contract, CONFIG_QUERY).await?;
        let state = self.smart_query(contract, STATE_QUERY).await?;
        power_market_from_responses(&config, &state)
    }

    async fn spot_price(&self, pool_id: u64, base_denom: &str, quote_denom: &str) -> FloodResult<Decimal> {
        let response: SpotPriceResponse = self
            .unary(
                SPOT_PRICE,
                SpotPriceRequest {
                    pool_id,
                    base_asset_denom: base_denom.to_string(),
                    quote_asset_denom: quote_denom.to_string(),
                },
            )
            .await?;

        parse_decimal("spot_price", &response.spot_price)
    }

    async fn user_positions(&self, pool_id: u64, address: &str) -> FloodResult<Vec<Position>> {
        let mut positions = Vec::new();
        let mut next_key = Vec::new();

        loop {
            let response: UserPositionsResponse = self
                .unary(
                    USER_POSITIONS,
                    UserPositionsRequest {
                        address: address.to_string(),
                        pool_id,
                        pagination: Some(PageRequest {
                            key: next_key,
                            limit: GRANT_PAGE_LIMIT,
                            ..Default::default()
                        }),
                    },
                )
                .await?;

            positions.extend(response.positions.into_iter().filter_map(Position::from_breakdown));

            match response.pagination {
                Some(page) if !page.next_key.is_empty() => next_key = page.next_key,
                _ => break,
            }
        }

        Ok(positions)
    }

    async fn current_tick(&self, pool_id: u64) -> FloodResult<i64> {
        let response: PoolResponse = self.unary(POOL, PoolRequest { pool_id }).await?;

        let any = response
            .pool
            .ok_or_else(|| FloodError::query_error(POOL, format!("pool {} not found", pool_id)))?;
        if any.type_url != CL_POOL_TYPE_URL {
            return Err(FloodError::decode_error(&any.type_url, "expected a concentrated-liquidity pool"));
        }

        let pool = Pool::decode(any.value.as_slice()).map_err(|e| FloodError::decode_error(CL_POOL_TYPE_URL, e))?;
        Ok(pool.current_tick)
    }
}
