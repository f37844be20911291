//! Flutter-facing bindings for TreeLog core.

pub mod api;
