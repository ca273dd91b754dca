pub mod dump;
pub mod erc55;
pub mod format;
pub mod input;
pub mod keccak;
pub mod parse;
pub mod trace;
pub mod uri;
