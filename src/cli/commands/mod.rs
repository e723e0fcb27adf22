pub mod ls;
pub mod resolve;
pub mod search;
