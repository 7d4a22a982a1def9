//! openbrowser — local open-URL server library.
//!
//! This library exposes the core components of openbrowser for integration
//! testing and programmatic use. The binary entrypoint is in `main.rs`.

pub mod audit;
pub mod cli;
pub mod gateway;
pub mod policy;
