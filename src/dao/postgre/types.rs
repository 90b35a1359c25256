use sqlx::{
    postgres::{PgPoolOptions, PgQueryResult},
    PgPool, Postgres, Transaction,
};

pub type PoolType = PgPool;
pub type PoolOption = PgPoolOptions;
pub type QueryResult = PgQueryResult;
pub type DataBase = Postgres;
pub type DBTransaction<'a> = Transaction<'a, Postgres>;
