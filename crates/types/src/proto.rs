//! Protobuf wire messages for the chain modules the keeper talks to.
//!
//! Only the fields the keeper reads or writes are declared. prost skips
//! unknown fields on decode, so responses carrying more data still decode.

pub use prost_types::{Any, Timestamp};

// ============================================================================
// cosmos.base
// ============================================================================

pub mod base {
    /// cosmos.base.v1beta1.Coin
    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct Coin {
        #[prost(string, tag = "1")]
        pub denom: String,
        #[prost(string, tag = "2")]
        pub amount: String,
    }

    /// cosmos.base.query.v1beta1.PageRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PageRequest {
        #[prost(bytes = "vec", tag = "1")]
        pub key: Vec<u8>,
        #[prost(uint64, tag = "2")]
        pub offset: u64,
        #[prost(uint64, tag = "3")]
        pub limit: u64,
        #[prost(bool, tag = "4")]
        pub count_total: bool,
        #[prost(bool, tag = "5")]
        pub reverse: bool,
    }

    /// cosmos.base.query.v1beta1.PageResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PageResponse {
        #[prost(bytes = "vec", tag = "1")]
        pub next_key: Vec<u8>,
        #[prost(uint64, tag = "2")]
        pub total: u64,
    }
}

// ============================================================================
// cosmos.authz
// ============================================================================

pub mod authz {
    use super::base::{PageRequest, PageResponse};
    use super::{Any, Timestamp};

    /// cosmos.authz.v1beta1.GenericAuthorization
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct GenericAuthorization {
        #[prost(string, tag = "1")]
        pub msg: String,
    }

    /// cosmos.authz.v1beta1.GrantAuthorization
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct GrantAuthorization {
        #[prost(string, tag = "1")]
        pub granter: String,
        #[prost(string, tag = "2")]
        pub grantee: String,
        #[prost(message, optional, tag = "3")]
        pub authorization: Option<Any>,
        #[prost(message, optional, tag = "4")]
        pub expiration: Option<Timestamp>,
    }

    /// cosmos.authz.v1beta1.QueryGranteeGrantsRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QueryGranteeGrantsRequest {
        #[prost(string, tag = "1")]
        pub grantee: String,
        #[prost(message, optional, tag = "2")]
        pub pagination: Option<PageRequest>,
    }

    /// cosmos.authz.v1beta1.QueryGranteeGrantsResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QueryGranteeGrantsResponse {
        #[prost(message, repeated, tag = "1")]
        pub grants: Vec<GrantAuthorization>,
        #[prost(message, optional, tag = "2")]
        pub pagination: Option<PageResponse>,
    }

    /// cosmos.authz.v1beta1.MsgExec
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MsgExec {
        #[prost(string, tag = "1")]
        pub grantee: String,
        #[prost(message, repeated, tag = "2")]
        pub msgs: Vec<Any>,
    }
}

// ============================================================================
// osmosis.concentratedliquidity
// ============================================================================

pub mod cl {
    use super::base::{Coin, PageRequest, PageResponse};
    use super::Timestamp;

    /// osmosis.concentratedliquidity.v1beta1.Position
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Position {
        #[prost(uint64, tag = "1")]
        pub position_id: u64,
        #[prost(string, tag = "2")]
        pub address: String,
        #[prost(uint64, tag = "3")]
        pub pool_id: u64,
        #[prost(int64, tag = "4")]
        pub lower_tick: i64,
        #[prost(int64, tag = "5")]
        pub upper_tick: i64,
        #[prost(message, optional, tag = "6")]
        pub join_time: Option<Timestamp>,
        #[prost(string, tag = "7")]
        pub liquidity: String,
    }

    /// osmosis.concentratedliquidity.v1beta1.FullPositionBreakdown
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct FullPositionBreakdown {
        #[prost(message, optional, tag = "1")]
        pub position: Option<Position>,
        #[prost(message, optional, tag = "2")]
        pub asset0: Option<Coin>,
        #[prost(message, optional, tag = "3")]
        pub asset1: Option<Coin>,
    }

    /// osmosis.concentratedliquidity.v1beta1.UserPositionsRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UserPositionsRequest {
        #[prost(string, tag = "1")]
        pub address: String,
        #[prost(uint64, tag = "2")]
        pub pool_id: u64,
        #[prost(message, optional, tag = "3")]
        pub pagination: Option<PageRequest>,
    }

    /// osmosis.concentratedliquidity.v1beta1.UserPositionsResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UserPositionsResponse {
        #[prost(message, repeated, tag = "1")]
        pub positions: Vec<FullPositionBreakdown>,
        #[prost(message, optional, tag = "2")]
        pub pagination: Option<PageResponse>,
    }

    /// osmosis.concentratedliquidity.v1beta1.Pool
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Pool {
        #[prost(string, tag = "1")]
        pub address: String,
        #[prost(uint64, tag = "4")]
        pub id: u64,
        #[prost(string, tag = "6")]
        pub token0: String,
        #[prost(string, tag = "7")]
        pub token1: String,
        #[prost(string, tag = "8")]
        pub current_sqrt_price: String,
        #[prost(int64, tag = "9")]
        pub current_tick: i64,
        #[prost(uint64, tag = "10")]
        pub tick_spacing: u64,
    }

    /// osmosis.concentratedliquidity.v1beta1.MsgCreatePosition
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MsgCreatePosition {
        #[prost(uint64, tag = "1")]
        pub pool_id: u64,
        #[prost(string, tag = "2")]
        pub sender: String,
        #[prost(int64, tag = "3")]
        pub lower_tick: i64,
        #[prost(int64, tag = "4")]
        pub upper_tick: i64,
        #[prost(message, repeated, tag = "5")]
        pub tokens_provided: Vec<Coin>,
        #[prost(string, tag = "6")]
        pub token_min_amount0: String,
        #[prost(string, tag = "7")]
        pub token_min_amount1: String,
    }

    /// osmosis.concentratedliquidity.v1beta1.MsgWithdrawPosition
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MsgWithdrawPosition {
        #[prost(uint64, tag = "1")]
        pub position_id: u64,
        #[prost(string, tag = "2")]
        pub sender: String,
        #[prost(string, tag = "3")]
        pub liquidity_amount: String,
    }
}

// ============================================================================
// osmosis.poolmanager
// ============================================================================

pub mod poolmanager {
    use super::Any;

    /// osmosis.poolmanager.v1beta1.SpotPriceRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SpotPriceRequest {
        #[prost(uint64, tag = "1")]
        pub pool_id: u64,
        #[prost(string, tag = "2")]
        pub base_asset_denom: String,
        #[prost(string, tag = "3")]
        pub quote_asset_denom: String,
    }

    /// osmosis.poolmanager.v1beta1.SpotPriceResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SpotPriceResponse {
        #[prost(string, tag = "1")]
        pub spot_price: String,
    }

    /// osmosis.poolmanager.v1beta1.PoolRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PoolRequest {
        #[prost(uint64, tag = "1")]
        pub pool_id: u64,
    }

    /// osmosis.poolmanager.v1beta1.PoolResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PoolResponse {
        #[prost(message, optional, tag = "1")]
        pub pool: Option<Any>,
    }
}

// ============================================================================
// cosmwasm.wasm
// ============================================================================

pub mod wasm {
    /// cosmwasm.wasm.v1.QuerySmartContractStateRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QuerySmartContractStateRequest {
        #[prost(string, tag = "1")]
        pub address: String,
        #[prost(bytes = "vec", tag = "2")]
        pub query_data: Vec<u8>,
    }

    /// cosmwasm.wasm.v1.QuerySmartContractStateResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QuerySmartContractStateResponse {
        #[prost(bytes = "vec", tag = "1")]
        pub data: Vec<u8>,
    }
}

// ============================================================================
// cosmos.auth and cosmos.crypto
// ============================================================================

pub mod auth {
    use super::Any;

    /// cosmos.auth.v1beta1.QueryAccountRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QueryAccountRequest {
        #[prost(string, tag = "1")]
        pub address: String,
    }

    /// cosmos.auth.v1beta1.QueryAccountResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct QueryAccountResponse {
        #[prost(message, optional, tag = "1")]
        pub account: Option<Any>,
    }

    /// cosmos.auth.v1beta1.BaseAccount
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct BaseAccount {
        #[prost(string, tag = "1")]
        pub address: String,
        #[prost(message, optional, tag = "2")]
        pub pub_key: Option<Any>,
        #[prost(uint64, tag = "3")]
        pub account_number: u64,
        #[prost(uint64, tag = "4")]
        pub sequence: u64,
    }

    /// cosmos.crypto.secp256k1.PubKey
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Secp256k1PubKey {
        #[prost(bytes = "vec", tag = "1")]
        pub key: Vec<u8>,
    }
}

// ============================================================================
// cosmos.tx
// ============================================================================

pub mod tx {
    use super::base::Coin;
    use super::Any;

    /// cosmos.tx.v1beta1.TxBody
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TxBody {
        #[prost(message, repeated, tag = "1")]
        pub messages: Vec<Any>,
        #[prost(string, tag = "2")]
        pub memo: String,
        #[prost(uint64, tag = "3")]
        pub timeout_height: u64,
    }

    /// cosmos.tx.v1beta1.AuthInfo
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct AuthInfo {
        #[prost(message, repeated, tag = "1")]
        pub signer_infos: Vec<SignerInfo>,
        #[prost(message, optional, tag = "2")]
        pub fee: Option<Fee>,
    }

    /// cosmos.tx.v1beta1.SignerInfo
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SignerInfo {
        #[prost(message, optional, tag = "1")]
        pub public_key: Option<Any>,
        #[prost(message, optional, tag = "2")]
        pub mode_info: Option<ModeInfo>,
        #[prost(uint64, tag = "3")]
        pub sequence: u64,
    }

    /// cosmos.tx.v1beta1.ModeInfo
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ModeInfo {
        #[prost(oneof = "mode_info::Sum", tags = "1")]
        pub sum: Option<mode_info::Sum>,
    }

    pub mod mode_info {
        /// cosmos.tx.v1beta1.ModeInfo.Single
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Single {
            #[prost(int32, tag = "1")]
            pub mode: i32,
        }

        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Sum {
            #[prost(message, tag = "1")]
            Single(Single),
        }
    }

    /// cosmos.tx.v1beta1.Fee
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Fee {
        #[prost(message, repeated, tag = "1")]
        pub amount: Vec<Coin>,
        #[prost(uint64, tag = "2")]
        pub gas_limit: u64,
        #[prost(string, tag = "3")]
        pub payer: String,
        #[prost(string, tag = "4")]
        pub granter: String,
    }

    /// cosmos.tx.v1beta1.SignDoc
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SignDoc {
        #[prost(bytes = "vec", tag = "1")]
        pub body_bytes: Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub auth_info_bytes: Vec<u8>,
        #[prost(string, tag = "3")]
        pub chain_id: String,
        #[prost(uint64, tag = "4")]
        pub account_number: u64,
    }

    /// cosmos.tx.v1beta1.TxRaw
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TxRaw {
        #[prost(bytes = "vec", tag = "1")]
        pub body_bytes: Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub auth_info_bytes: Vec<u8>,
        #[prost(bytes = "vec", repeated, tag = "3")]
        pub signatures: Vec<Vec<u8>>,
    }

    /// cosmos.tx.v1beta1.SimulateRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SimulateRequest {
        #[prost(bytes = "vec", tag = "2")]
        pub tx_bytes: Vec<u8>,
    }

    /// cosmos.tx.v1beta1.SimulateResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SimulateResponse {
        #[prost(message, optional, tag = "1")]
        pub gas_info: Option<GasInfo>,
    }

    /// cosmos.base.abci.v1beta1.GasInfo
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct GasInfo {
        #[prost(uint64, tag = "1")]
        pub gas_wanted: u64,
        #[prost(uint64, tag = "2")]
        pub gas_used: u64,
    }

    /// cosmos.tx.v1beta1.BroadcastTxRequest
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct BroadcastTxRequest {
        #[prost(bytes = "vec", tag = "1")]
        pub tx_bytes: Vec<u8>,
        #[prost(int32, tag = "2")]
        pub mode: i32,
    }

    /// cosmos.tx.v1beta1.BroadcastTxResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct BroadcastTxResponse {
        #[prost(message, optional, tag = "1")]
        pub tx_response: Option<TxResponse>,
    }

    /// cosmos.base.abci.v1beta1.TxResponse
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TxResponse {
        #[prost(int64, tag = "1")]
        pub height: i64,
        #[prost(string, tag = "2")]
        pub txhash: String,
        #[prost(string, tag = "3")]
        pub codespace: String,
        #[prost(uint32, tag = "4")]
        pub code: u32,
        #[prost(string, tag = "6")]
        pub raw_log: String,
    }
}
