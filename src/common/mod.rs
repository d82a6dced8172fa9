pub mod context;
pub mod env;
pub mod error;
pub mod flash;
pub mod init;
pub mod state;
pub mod unit_of_work;
