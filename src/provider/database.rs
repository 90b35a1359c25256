use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{Account_Tx, Block, Price, Reward, Table, Tx},
};

#[derive(Debug)]
pub struct DatabasePool {
    pub block: Table<Block>,
    pub tx: Table<Tx>,
    pub account_tx: Table<Account_Tx>,
    pub price: Table<Price>,
    pub reward: Table<Reward>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .after_connect(|_conn, _meta| Box::pin(async move { Ok(()) }))
            .max_connections(config.db_max_connections)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool {
            block: Table::new(pool.clone()),
            tx: Table::new(pool.clone()),
            account_tx: Table::new(pool.clone()),
            price: Table::new(pool.clone()),
            reward: Table::new(pool.clone()),
            pool,
        })
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
