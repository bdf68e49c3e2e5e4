//! Shared utilities and error types for the ranked-ballot contract suite.
//!
//! This crate provides:
//! - [`CommonError`]: standardised error codes shared by every contract.
//! - [`auth_policy`]: the pluggable administrator guard (single key,
//!   M-of-N threshold, or role list) consulted before any admin mutation.
//!
//! Contract-specific errors map these codes into their own enums through
//! `From<CommonError>` so callers only ever see one error type per contract.

#![no_std]
#![allow(clippy::arithmetic_side_effects)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod auth_policy;

pub use auth_policy::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Standardised error codes shared by every contract in the workspace.
///
/// # Code ranges
/// | Range   | Purpose                       |
/// |---------|-------------------------------|
/// | 1 – 9   | Lifecycle / initialisation    |
/// | 10 – 19 | Authentication & authorisation|
/// | 30 – 39 | Validation / input            |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    AccessDenied = 10,
    /// A threshold policy is configured and not enough co-signers approved.
    ApprovalThresholdNotMet = 11,
    /// Caller is not a signer of the active threshold policy.
    NotASigner = 12,
    InvalidInput = 30,
}
