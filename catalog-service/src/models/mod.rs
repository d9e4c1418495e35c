pub mod book;
pub mod filter;
pub mod query;
pub mod responses;
