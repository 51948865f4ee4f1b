/*!
dv-router-sim
=============

A distance-vector routing protocol engine for a discrete-event network
simulator, with a MAC-learning switch engine sharing the same inbound event
contract, and a small in-crate harness sufficient to drive both end to end.

# Modules

* [`error`] — the crate's typed error enum.
* [`host`] — opaque identifiers: [`host::HostId`] for routing destinations,
  [`host::NodeId`] for transport/topology addressing.
* [`port_table`] — sparse per-port link state.
* [`policy`] — the mutable [`policy::Config`] builder and the frozen,
  `Copy` [`policy::PolicyConfig`] it produces.
* [`table_entry`] and [`routing_table`] — the validated routing table model.
* [`packet`] — the wire format: [`packet::Envelope`] and [`packet::PacketKind`].
* [`action`] — [`action::EngineAction`], what an engine asks its host to do.
* [`dv_router`] — the distance-vector routing engine itself.
* [`learning_switch`] — the MAC-learning alternative engine.
* [`harness`] — a crate-internal discrete-event driver used by the demo binary
  and the integration tests.
*/

pub mod action;
pub mod dv_router;
pub mod error;
pub mod harness;
pub mod host;
pub mod learning_switch;
pub mod packet;
pub mod policy;
pub mod port_table;
pub mod routing_table;
pub mod table_entry;
