//! surfmon Collect - captures raw probe output on the local host
//!
//! A [`Collector`] turns a list of probes into a [`Snapshot`](surfmon_core::Snapshot).
//! [`LocalCollector`] runs each probe's command through a shell.

pub mod local;

pub use local::{Collector, LocalCollector};
