//! # op-derive
//!
//! A decoder for Optimism's execution payload wire format, paired with a
//! client for the L1 consensus-layer beacon API that locates and fetches the
//! blob sidecars carrying batcher calldata.
//!
//! ## Modules
//!
//! - [`ssz`]: decodes `ExecutionPayload` bytes from the engine API's SSZ wire
//!   format, for both the pre- and post-withdrawals payload shapes.
//! - [`l1`]: fetches beacon genesis/spec data and blob sidecars, and
//!   reassembles blob contents back into batcher calldata.
//! - [`common`]: block reference types shared across the fetcher and runner.
//! - [`config`]: configuration for the beacon fetcher.
//! - [`telemetry`]: application logging and metrics.
//! - [`runner`]: polls L1 for blob sidecars and decodes each into a payload.
#![warn(
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    rustdoc::all
)]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod common;
pub mod config;
pub mod l1;
pub mod runner;
pub mod ssz;
pub mod telemetry;
