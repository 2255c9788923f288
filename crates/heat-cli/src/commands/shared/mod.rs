pub mod parse;
pub mod request;
