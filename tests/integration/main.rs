//! End-to-end tests of the permission engine over the in-memory store.

mod admin;
mod helpers;
mod properties;
mod scenarios;
