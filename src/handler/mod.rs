pub mod account_tx;
pub mod reward;
pub mod tax;
pub mod tax_policy;
pub mod tx;
