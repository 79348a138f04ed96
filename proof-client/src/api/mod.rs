//! Resource endpoints. Each function maps one API route onto a [`ProofClient`](crate::ProofClient) verb call.

pub mod documents;
pub mod integrations;
pub mod notaries;
pub mod real_estate;
pub mod referrals;
pub mod scim;
pub mod templates;
pub mod transactions;
pub mod webhooks;
