/*!

Routing table entries (§4.3).

In the original Python implementation `TableEntry` validates that `destination` is a
host, `port` is an integer and `latency`/`expire_time` are numeric, because the
language gives none of that for free. Rust's type system already guarantees the
first two (the constructor only accepts a `HostId` and a `usize`), so `InvalidEntry`
here is reserved for what the type system cannot rule out: a non-finite or negative
latency, or a `NaN` expiry.

*/

use crate::error::EngineError;
use crate::host::HostId;
use crate::policy::{Time, FOREVER};

/// An immutable route from a neighbor to some destination host, installed via port
/// `port` at cost `latency`, due to expire at `expire_time` (or `FOREVER` for a
/// static, directly-attached route).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableEntry
{
	pub destination: HostId,
	pub port: usize,
	pub latency: Time,
	pub expire_time: Time,
}

impl TableEntry
{
	pub fn new(destination: HostId, port: usize, latency: Time, expire_time: Time) -> Result<Self, EngineError>
	{
		if !latency.is_finite() || latency < 0.0
		{
			return Err(EngineError::InvalidEntry {
				reason: format!("latency must be a non-negative finite number, got {latency}"),
			});
		}
		if expire_time.is_nan()
		{
			return Err(EngineError::InvalidEntry {
				reason: "expire_time must not be NaN".to_string(),
			});
		}
		Ok(TableEntry { destination, port, latency, expire_time })
	}

	/// `true` iff `now` strictly exceeds `expire_time`. `FOREVER` entries are never
	/// expired.
	pub fn is_expired(&self, now: Time) -> bool
	{
		self.expire_time != FOREVER && now > self.expire_time
	}

	pub fn is_static(&self) -> bool
	{
		self.expire_time == FOREVER
	}
}
