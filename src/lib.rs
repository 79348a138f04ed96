//! `proof` command-line front end over [`proof_client`].

pub mod cli;
pub mod commands;
pub mod output;
