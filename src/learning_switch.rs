/*!

The learning-switch engine (§4.6): an alternative to `DvRouterEngine` sharing the
same inbound event contract but speaking MAC-learning instead of distance-vector.
Grounded on `learning_switch.LearningSwitch`/`ls.learning_switch_base`, adapted to
return `EngineAction`s the way `DvRouterEngine` does instead of calling back into
the simulator directly.

*/

use log::{debug, info, trace};

use crate::action::{EngineAction, TimerKind};
use crate::host::{HostId, NodeId};
use crate::packet::{DataPacket, Envelope, PacketKind};
use crate::policy::Time;
use crate::port_table::PortTable;
use std::collections::BTreeMap;

/// Default age-out interval for learned entries, matching `LearningSwitch.TIMEOUT`
/// in the source.
pub const DEFAULT_TIMEOUT: Time = 15.0;

/// Default internal timer period, matching `LearningSwitchBase.TIMER_INTERVAL`.
pub const DEFAULT_TIMER_INTERVAL: Time = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct LearnedEntry
{
	port: usize,
	last_seen: Time,
}

/// Learns `source host -> port` associations from data packets; forwards known
/// destinations, floods unknowns, and ages learned entries out after `timeout`.
#[derive(Debug, Clone)]
pub struct LearningSwitchEngine
{
	timeout: Time,
	timer_interval: Time,
	ports: PortTable,
	table: BTreeMap<HostId, LearnedEntry>,
}

impl LearningSwitchEngine
{
	pub fn new(timeout: Time, timer_interval: Time) -> (Self, Vec<EngineAction>)
	{
		let engine = LearningSwitchEngine { timeout, timer_interval, ports: PortTable::new(), table: BTreeMap::new() };
		let actions = vec![EngineAction::ScheduleTimer { interval: timer_interval, recurring: true, kind: TimerKind::Periodic }];
		(engine, actions)
	}

	pub fn ports(&self) -> &PortTable
	{
		&self.ports
	}

	pub fn timer_interval(&self) -> Time
	{
		self.timer_interval
	}

	pub fn learned_port(&self, host: &HostId) -> Option<usize>
	{
		self.table.get(host).map(|entry| entry.port)
	}

	/// Dispatches a received packet: host-discovery packets are consumed
	/// silently (§4.6); everything else is a data packet.
	pub fn handle_rx(&mut self, packet: &Envelope, in_port: usize, now: Time) -> Vec<EngineAction>
	{
		match &packet.kind
		{
			PacketKind::HostDiscovery { .. } => Vec::new(),
			PacketKind::Data(data) => self.on_data_packet(packet.src, data, in_port, now),
			PacketKind::Advertisement(_) =>
			{
				debug!("learning switch ignoring advertisement packet");
				Vec::new()
			}
		}
	}

	/// Learns `source -> in_port`, then forwards to the learned port if the
	/// destination is known, otherwise floods every up port except the arrival
	/// port (§4.6).
	fn on_data_packet(&mut self, src: NodeId, packet: &DataPacket, in_port: usize, now: Time) -> Vec<EngineAction>
	{
		let source_host = HostId(src.0 as u32);
		self.table.insert(source_host, LearnedEntry { port: in_port, last_seen: now });
		trace!("learned {source_host} on port {in_port}");

		if let Some(entry) = self.table.get(&packet.destination)
		{
			debug!("forwarding data packet for {} out learned port {}", packet.destination, entry.port);
			vec![EngineAction::Send { port: entry.port, kind: PacketKind::Data(packet.clone()) }]
		}
		else
		{
			debug!("flooding data packet for {}: destination unknown", packet.destination);
			self.ports
				.up_ports()
				.into_iter()
				.filter(|&port| port != in_port)
				.map(|port| EngineAction::Send { port, kind: PacketKind::Data(packet.clone()) })
				.collect()
		}
	}

	/// Refreshes the timestamp of every entry pointing at `port`, so it is not
	/// immediately reaped by the next timer pass (§4.6).
	pub fn handle_link_up(&mut self, port: usize, latency: Time, now: Time)
	{
		self.ports.set(port, Some(latency));
		for entry in self.table.values_mut()
		{
			if entry.port == port
			{
				entry.last_seen = now;
			}
		}
		info!("link up: port {port} at latency {latency}");
	}

	/// Invalidates every entry pointing at `port` by setting its timestamp far
	/// enough in the past that the next timer pass drops it (§4.6).
	pub fn handle_link_down(&mut self, port: usize, now: Time)
	{
		self.ports.set(port, None);
		for entry in self.table.values_mut()
		{
			if entry.port == port
			{
				entry.last_seen = now - self.timeout - 1.0;
			}
		}
		info!("link down: port {port}");
	}

	/// Deletes entries older than `timeout` (§4.6).
	pub fn handle_timer(&mut self, now: Time)
	{
		let stale: Vec<HostId> = self
			.table
			.iter()
			.filter(|(_, entry)| now - entry.last_seen > self.timeout)
			.map(|(host, _)| *host)
			.collect();
		for host in stale
		{
			self.table.remove(&host);
			info!("learned entry for {host} aged out");
		}
	}
}
