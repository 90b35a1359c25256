use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    constants::{
        MSG_EXEC, MSG_EXECUTE_CONTRACT, MSG_EXEC_AUTHORIZED,
        MSG_INSTANTIATE_CONTRACT, MSG_INSTANTIATE_CONTRACT_2, MSG_MULTI_SEND,
        MSG_SEND, MSG_SWAP_SEND,
    },
    error::Error,
};

use super::Coin;

/// Message tags that carry taxable coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Send,
    MultiSend,
    SwapSend,
    InstantiateContract,
    InstantiateContract2,
    ExecuteContract,
    ExecAuthorized,
    Exec,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            MessageType::Send => MSG_SEND,
            MessageType::MultiSend => MSG_MULTI_SEND,
            MessageType::SwapSend => MSG_SWAP_SEND,
            MessageType::InstantiateContract => MSG_INSTANTIATE_CONTRACT,
            MessageType::InstantiateContract2 => MSG_INSTANTIATE_CONTRACT_2,
            MessageType::ExecuteContract => MSG_EXECUTE_CONTRACT,
            MessageType::ExecAuthorized => MSG_EXEC_AUTHORIZED,
            MessageType::Exec => MSG_EXEC,
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for MessageType {
    type Err = Error;

    fn from_str(value: &str) -> Result<MessageType, Self::Err> {
        match value {
            MSG_SEND => Ok(MessageType::Send),
            MSG_MULTI_SEND => Ok(MessageType::MultiSend),
            MSG_SWAP_SEND => Ok(MessageType::SwapSend),
            MSG_INSTANTIATE_CONTRACT => Ok(MessageType::InstantiateContract),
            MSG_INSTANTIATE_CONTRACT_2 => Ok(MessageType::InstantiateContract2),
            MSG_EXECUTE_CONTRACT => Ok(MessageType::ExecuteContract),
            MSG_EXEC_AUTHORIZED => Ok(MessageType::ExecAuthorized),
            MSG_EXEC => Ok(MessageType::Exec),
            _ => Err(Error::FieldNotExist(format!(
                "message type not supported: {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgSend {
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub to_address: String,
    pub amount: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultiSendEntry {
    #[serde(default)]
    pub address: String,
    pub coins: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgMultiSend {
    pub inputs: Vec<MultiSendEntry>,
    #[serde(default)]
    pub outputs: Vec<MultiSendEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgSwapSend {
    pub offer_coin: Coin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgInstantiateContract {
    #[serde(default)]
    pub init_coins: Option<Vec<Coin>>,
    #[serde(default)]
    pub funds: Option<Vec<Coin>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgInstantiateContract2 {
    pub funds: Vec<Coin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgExecuteContract {
    #[serde(default)]
    pub coins: Option<Vec<Coin>>,
    #[serde(default)]
    pub funds: Option<Vec<Coin>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgExec {
    pub msgs: Vec<Value>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Send(MsgSend),
    MultiSend(MsgMultiSend),
    SwapSend(MsgSwapSend),
    InstantiateContract(MsgInstantiateContract),
    InstantiateContract2(MsgInstantiateContract2),
    ExecuteContract(MsgExecuteContract),
    Exec(Vec<Message>),
    /// Any tag without a taxable coin field.
    Other(String),
}

impl Message {
    /// Decodes an amino `{ "type": .., "value": .. }` envelope. A known tag
    /// whose value lacks its coin field yields [`Error::TaxFieldNotFound`].
    pub fn from_value(
        value: &Value,
        height: &str,
        hash: &str,
    ) -> Result<Message, Error> {
        let tag = value.get("type").and_then(Value::as_str).unwrap_or("");
        let kind = match MessageType::from_str(tag) {
            Ok(kind) => kind,
            Err(_) => return Ok(Message::Other(tag.to_owned())),
        };

        let body = value.get("value").cloned().unwrap_or(Value::Null);
        let not_found = || Error::TaxFieldNotFound {
            msg_type: kind.to_string(),
            height: height.to_owned(),
            hash: hash.to_owned(),
        };

        fn decode<T: DeserializeOwned>(
            body: Value,
            not_found: impl Fn() -> Error,
        ) -> Result<T, Error> {
            serde_json::from_value(body).map_err(|_| not_found())
        }

        let message = match kind {
            MessageType::Send => Message::Send(decode(body, not_found)?),
            MessageType::MultiSend => {
                Message::MultiSend(decode(body, not_found)?)
            },
            MessageType::SwapSend => {
                Message::SwapSend(decode(body, not_found)?)
            },
            MessageType::InstantiateContract => {
                let msg: MsgInstantiateContract = decode(body, not_found)?;
                if msg.init_coins.is_none() && msg.funds.is_none() {
                    return Err(not_found());
                }
                Message::InstantiateContract(msg)
            },
            MessageType::InstantiateContract2 => {
                Message::InstantiateContract2(decode(body, not_found)?)
            },
            MessageType::ExecuteContract => {
                let msg: MsgExecuteContract = decode(body, not_found)?;
                if msg.coins.is_none() && msg.funds.is_none() {
                    return Err(not_found());
                }
                Message::ExecuteContract(msg)
            },
            MessageType::ExecAuthorized | MessageType::Exec => {
                let msg: MsgExec = decode(body, not_found)?;
                let msgs = msg
                    .msgs
                    .iter()
                    .map(|item| Message::from_value(item, height, hash))
                    .collect::<Result<Vec<Message>, Error>>()?;
                Message::Exec(msgs)
            },
        };

        Ok(message)
    }
}
