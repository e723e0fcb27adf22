pub mod config;
pub mod convert;
pub mod drive;
pub mod oracle;
pub mod retry;
