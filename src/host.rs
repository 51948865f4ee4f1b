/*!

Participant identities.

Two distinct opaque identifiers are used: destinations in the routing table are
always host identities, never routers.

- `HostId` names a host — the only kind of identity that ever appears as a routing
  table destination or an advertisement's semantic destination.
- `NodeId` names any entity attached to the harness's topology graph (a router or a
  host) — used purely for packet transport addressing (`Envelope::src`/`dst`) and
  path tracing, which the protocol core never inspects for routing decisions.

Both are harness-assigned; the engines only ever compare, hash and copy them.

*/

use std::fmt;

/// An opaque host identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostId(pub u32);

impl fmt::Display for HostId
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "h{}", self.0)
	}
}

/// An opaque transport-level participant identity (router or host).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "n{}", self.0)
	}
}
