#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core primitives shared by the SIWE crates.
//!
//! - [`keccak`]: Keccak-256 (original padding, as used by Ethereum)
//! - [`erc55`]: mixed-case checksum encoding of Ethereum addresses
//! - [`Colors`]: ANSI palette for dumps and traces

mod colors;
pub mod erc55;
pub mod keccak;


pub use colors::Colors;
pub use erc55::{Erc55Error, is_erc55, to_erc55};
pub use keccak::{HashError, keccak256, keccak256_bytes};
