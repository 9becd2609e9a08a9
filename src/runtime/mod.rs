//! Refresh runtime that rebuilds and publishes ranking index snapshots.

/// Runtime event payloads.
pub mod events;
/// Runtime handle, configuration and rebuild loop.
pub mod handle;
