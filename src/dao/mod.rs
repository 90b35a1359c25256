mod postgre;

pub use postgre::{
    get_path, read_migration, DBTransaction, DataBase, PoolOption, PoolType,
    QueryResult,
};
