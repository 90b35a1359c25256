//! Chain payload types
//!
//! LCD response shapes, the legacy transaction payload and the
//! denomination map shared by ingestion and aggregation.

mod denom_map;
mod lcd_tx;
mod message;
mod treasury;

pub use denom_map::DenomMap;

pub use lcd_tx::{
    Coin, LcdTransaction, LcdTx, StdFee, StdTx, TxAttribute, TxEvent, TxLog,
};

pub use message::{
    Message, MessageType, MsgExec, MsgExecuteContract, MsgInstantiateContract,
    MsgInstantiateContract2, MsgMultiSend, MsgSend, MsgSwapSend,
    MultiSendEntry,
};

pub use treasury::{
    ActiveDenomsResponse, Pagination, SupplyResponse, TaxCap, TaxCapsResponse,
    TaxExemptionListResponse, TaxPolicyParams, TaxRateResponse,
    TreasuryParams, TreasuryParamsResponse,
};
