//! Cross-subsystem flows.

pub mod envelope_flows;
pub mod replay;
pub mod vault_flows;
