// SPDX-License-Identifier: MIT OR Apache-2.0

//! owners-db - vcpkg file ownership databases
//!
//! Builds `VCPKGDatabase.txt` and `VCPKGHeadersDatabase.txt` either from the
//! `*.list` files of an installed tree or from the binary cache archives of
//! the ports a PR changed.

pub mod abi_map;
pub mod blob;
pub mod changed_ports;
pub mod commands;
pub mod config;
pub mod database;
pub mod errors;
pub mod indexer;
pub mod output;
