/*!

Packets (§4.2, §6): the tagged message variant the §9 redesign notes ask for in
place of the source's polymorphic `isinstance` dispatch.

An `Envelope` carries the transport-level `src`/`dst`/`trace`/`ttl` fields the
collaborator `Packet` base type names in §6; `PacketKind` is the payload
`handle_rx` pattern-matches on. The protocol core never reads the transport
`src`/`dst` to make a routing decision — it only ever looks at `in_port` and at the
semantic fields carried inside `PacketKind` (an advertisement's `destination`, a
data packet's `destination`, a host-discovery packet's `host`) — so those semantic
fields are modeled explicitly rather than reusing the transport addressing.
Visualization color attributes are out of scope (§1) and are not modeled.

*/

use crate::host::{HostId, NodeId};
use crate::policy::Time;

/// A route advertisement: `destination` is the host the route is for (the
/// *semantic* destination, §4.2); the envelope's transport `dst` is simply the
/// neighbor the packet is transmitted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvertisementPacket
{
	pub destination: HostId,
	pub latency: Time,
}

/// An opaque application payload addressed to `destination`, forwarded hop-by-hop
/// by table lookup rather than by transport addressing.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPacket
{
	pub destination: HostId,
	pub payload: Vec<u8>,
}

/// The payload of a packet in transit. `handle_rx` pattern-matches on this instead
/// of doing `isinstance` checks (§9).
#[derive(Debug, Clone, PartialEq)]
pub enum PacketKind
{
	Advertisement(AdvertisementPacket),
	/// Sent implicitly when a host attaches to a port (§6). `host` is the
	/// attaching host's identity.
	HostDiscovery { host: HostId },
	Data(DataPacket),
}

/// A packet in transit, carrying the transport-level fields named in §6 alongside
/// its typed payload. Packets are value objects with no defined equality beyond
/// structural comparison for tests (§4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope
{
	pub src: NodeId,
	pub dst: NodeId,
	pub trace: Vec<NodeId>,
	pub ttl: u32,
	pub kind: PacketKind,
}
