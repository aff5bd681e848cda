pub mod context;
pub mod database;
pub mod http;
pub mod prelude;
