pub use self::{database::DatabasePool, grpc::Grpc, lcd::Lcd};

mod database;
mod grpc;
mod lcd;
