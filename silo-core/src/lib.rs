mod builder;
mod client;
mod config;
mod driver;
mod entity;
mod error;
mod field;
mod hook;
mod mutation;
mod predicate;
mod row;
mod statement;
mod transaction;
mod value;

pub use builder::*;
pub use client::*;
pub use config::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use field::*;
pub use hook::*;
pub use mutation::*;
pub use predicate::*;
pub use row::*;
pub use statement::*;
pub use transaction::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = std::result::Result<T, Error>;
