pub use self::{
    path::{get_path, read_migration},
    types::{DBTransaction, DataBase, PoolOption, PoolType, QueryResult},
};

mod account_tx;
mod block;
mod path;
mod price;
mod reward;
mod tx;
mod types;
