/*!

The per-router port table (§4.1).

A sparse array indexed by port number; each slot is either *down* or carries the
latency of an *up* link, `None`-means-down, rather than a `HashMap<usize,_>`,
since ports are densely numbered from 0 in practice.

*/

use crate::policy::Time;

/// `(port, latency)` pair for an up port, in ascending port order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortInfo
{
	pub port: usize,
	pub latency: Time,
}

/// Sparse per-router port state. Slot `i` is `None` while port `i` is down (or has
/// never been addressed) and `Some(latency)` while it is up.
#[derive(Debug, Clone, Default)]
pub struct PortTable
{
	slots: Vec<Option<Time>>,
}

impl PortTable
{
	pub fn new() -> Self
	{
		PortTable { slots: Vec::new() }
	}

	/// Extends storage so `port` is addressable, then records its new state.
	/// Re-setting the same value is not an error.
	pub fn set(&mut self, port: usize, latency: Option<Time>)
	{
		if self.slots.len() <= port
		{
			self.slots.resize(port + 1, None);
		}
		self.slots[port] = latency;
	}

	/// The latency of `port` if up, `None` if down. Out-of-range ports are simply
	/// down; there is no error case.
	pub fn get(&self, port: usize) -> Option<Time>
	{
		self.slots.get(port).copied().flatten()
	}

	/// Port indices currently up, in ascending order.
	pub fn up_ports(&self) -> Vec<usize>
	{
		self.slots
			.iter()
			.enumerate()
			.filter_map(|(port, latency)| latency.map(|_| port))
			.collect()
	}

	/// `(port, latency)` pairs for up ports, in ascending port order.
	pub fn up_with_latency(&self) -> Vec<PortInfo>
	{
		self.slots
			.iter()
			.enumerate()
			.filter_map(|(port, latency)| latency.map(|latency| PortInfo { port, latency }))
			.collect()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn unset_port_is_down()
	{
		let table = PortTable::new();
		assert_eq!(table.get(0), None);
		assert_eq!(table.get(7), None);
	}

	#[test]
	fn set_then_get_roundtrips()
	{
		let mut table = PortTable::new();
		table.set(2, Some(1.5));
		assert_eq!(table.get(2), Some(1.5));
		assert_eq!(table.get(0), None);
		assert_eq!(table.get(1), None);
	}

	#[test]
	fn re_setting_same_value_is_not_an_error()
	{
		let mut table = PortTable::new();
		table.set(0, Some(1.0));
		table.set(0, Some(1.0));
		assert_eq!(table.get(0), Some(1.0));
	}

	#[test]
	fn up_ports_is_sorted_and_excludes_down()
	{
		let mut table = PortTable::new();
		table.set(3, Some(2.0));
		table.set(1, Some(1.0));
		table.set(0, None);
		assert_eq!(table.up_ports(), vec![1, 3]);
	}

	#[test]
	fn up_with_latency_matches_up_ports()
	{
		let mut table = PortTable::new();
		table.set(0, Some(4.0));
		table.set(1, None);
		table.set(2, Some(2.0));
		let pairs = table.up_with_latency();
		assert_eq!(pairs, vec![PortInfo { port: 0, latency: 4.0 }, PortInfo { port: 2, latency: 2.0 }]);
	}

	#[test]
	fn link_down_then_up_again()
	{
		let mut table = PortTable::new();
		table.set(0, Some(1.0));
		table.set(0, None);
		assert_eq!(table.get(0), None);
		table.set(0, Some(3.0));
		assert_eq!(table.get(0), Some(3.0));
	}
}
