use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

/// Legacy (amino JSON) transaction as served by the LCD `/txs/{hash}` route.
/// Unknown fields are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LcdTransaction {
    pub height: String,
    pub txhash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<TxLog>>,
    pub timestamp: String,
    pub tx: LcdTx,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LcdTransaction {
    pub fn is_failed(&self) -> bool {
        self.code.unwrap_or(0) != 0
    }

    pub fn logs(&self) -> &[TxLog] {
        self.logs.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LcdTx {
    #[serde(rename = "type", default)]
    pub r#type: String,
    pub value: StdTx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdTx {
    pub fee: StdFee,
    #[serde(default)]
    pub msg: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdFee {
    #[serde(default)]
    pub amount: Vec<Coin>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxLog {
    #[serde(default)]
    pub log: Value,
    #[serde(default)]
    pub events: Vec<TxEvent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub attributes: Vec<TxAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}
