//! Entitlement Core - Subscription Renewal-State Model
//!
//! This crate turns the loosely-typed subscription payload returned by the
//! billing backend into a strict, normalized entity with a closed set of
//! renewal states and a derived entitlement predicate.

pub mod domain;
