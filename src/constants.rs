//! Chain constants shared by tax resolution and aggregation.

// Columbus-5 charged no tax on the bonding denom until the burn tax upgrade.
pub const LEGACY_CHAIN_ID: &str = "columbus-5";
pub const BURN_TAX_UPGRADE_HEIGHT: i64 = 9_346_889;

pub const DEFAULT_BOND_DENOM: &str = "uluna";
pub const DEFAULT_STABLE_DENOM: &str = "uusd";
pub const DEFAULT_ACCOUNT_PREFIX: &str = "terra";

// Keeps one bulk insert under the Postgres bind parameter limit.
pub const DEFAULT_ACCOUNT_TX_CHUNK_SIZE: usize = 5000;

pub const HEIGHT_HEADER: &str = "x-cosmos-block-height";

// Message type tags.
pub const MSG_SEND: &str = "bank/MsgSend";
pub const MSG_MULTI_SEND: &str = "bank/MsgMultiSend";
pub const MSG_SWAP_SEND: &str = "market/MsgSwapSend";
pub const MSG_INSTANTIATE_CONTRACT: &str = "wasm/MsgInstantiateContract";
pub const MSG_INSTANTIATE_CONTRACT_2: &str = "wasm/MsgInstantiateContract2";
pub const MSG_EXECUTE_CONTRACT: &str = "wasm/MsgExecuteContract";
pub const MSG_EXEC_AUTHORIZED: &str = "msgauth/MsgExecAuthorized";
pub const MSG_EXEC: &str = "authz/MsgExec";

pub const SWAP_EVENT: &str = "swap";
pub const SWAP_FEE_ATTRIBUTE: &str = "swap_fee";
pub const TAX_LOG_KEY: &str = "tax";
