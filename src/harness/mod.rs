/*!

A minimal, crate-internal discrete-event harness (§10.4).

The simulator event loop, virtual clock, topology construction and packet
transport are all named as external collaborators out of scope for the protocol
core (§1, §6). This harness is the crate's own stand-in for that collaborator: a
virtual clock, a time-ordered event queue, a latency-weighted link graph, and a
dispatch loop that calls `handle_rx`/`handle_link_up`/`handle_link_down`/the timer
handlers on the right engine in delivery order (§5). It exists only so the engines
are runnable end-to-end in tests and in the demo binary; it is deliberately not a
topology-construction system or a visualizer, and the engines never depend on it —
they only ever see `Envelope`s, port numbers and `Time`, exactly as §6 specifies.

Modeled on the shape of the `EventQueue`/`Event` pair in `event.rs`: a
priority-ordered queue of typed events, each carrying the delay at which it should
next be processed.

*/

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use rand::Rng;

use crate::action::{EngineAction, TimerKind};
use crate::dv_router::DvRouterEngine;
use crate::host::{HostId, NodeId};
use crate::learning_switch::LearningSwitchEngine;
use crate::packet::{DataPacket, Envelope, PacketKind};
use crate::policy::{PolicyConfig, Time};

/// What a harness node runs. `Host` nodes are passive endpoints: they exist so
/// links can terminate on a named `HostId` and so delivered data packets can be
/// recorded for assertions, but they carry none of the `BasicHost` ping/pong
/// behavior from the source (out of scope, §1).
enum NodeSlot
{
	Router(DvRouterEngine),
	Switch(LearningSwitchEngine),
	Host(HostId),
}

#[derive(Debug, Clone, PartialEq)]
enum EventPayload
{
	Deliver { to: usize, in_port: usize, envelope: Envelope },
	Timer { to: usize, kind: TimerKind, interval: Time, recurring: bool },
}

#[derive(Debug, Clone, PartialEq)]
struct ScheduledEvent
{
	due: Time,
	seq: u64,
	payload: EventPayload,
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent
{
	fn partial_cmp(&self, other: &Self) -> Option<Ordering>
	{
		Some(self.cmp(other))
	}
}

impl Ord for ScheduledEvent
{
	/// Reversed so a max-`BinaryHeap` behaves as a min-heap on `(due, seq)` —
	/// earliest due time first, ties broken by arrival order (§5: "events are
	/// processed strictly in the order delivered").
	fn cmp(&self, other: &Self) -> Ordering
	{
		other.due.partial_cmp(&self.due).unwrap_or(Ordering::Equal).then_with(|| other.seq.cmp(&self.seq))
	}
}

/// A delivered data packet recorded at a host endpoint, for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery
{
	pub at: Time,
	pub destination: HostId,
	pub payload: Vec<u8>,
}

/// The discrete-event harness itself.
pub struct Harness
{
	clock: Time,
	nodes: Vec<NodeSlot>,
	/// `(node, port) -> (neighbor_node, neighbor_port, latency)`.
	links: HashMap<(usize, usize), (usize, usize, Time)>,
	events: BinaryHeap<ScheduledEvent>,
	seq: u64,
	deliveries: Vec<Delivery>,
}

impl Harness
{
	pub fn new() -> Self
	{
		Harness { clock: 0.0, nodes: Vec::new(), links: HashMap::new(), events: BinaryHeap::new(), seq: 0, deliveries: Vec::new() }
	}

	pub fn now(&self) -> Time
	{
		self.clock
	}

	pub fn add_router(&mut self, policy: PolicyConfig, rng: &mut impl Rng) -> usize
	{
		let start_delay_fraction = rng.gen::<f64>();
		let (engine, actions) = DvRouterEngine::new(policy, start_delay_fraction);
		let index = self.nodes.len();
		self.nodes.push(NodeSlot::Router(engine));
		self.process_actions(index, actions);
		index
	}

	pub fn add_switch(&mut self, timeout: Time, timer_interval: Time) -> usize
	{
		let (engine, actions) = LearningSwitchEngine::new(timeout, timer_interval);
		let index = self.nodes.len();
		self.nodes.push(NodeSlot::Switch(engine));
		self.process_actions(index, actions);
		index
	}

	pub fn add_host(&mut self, host: HostId) -> usize
	{
		let index = self.nodes.len();
		self.nodes.push(NodeSlot::Host(host));
		index
	}

	pub fn router(&self, index: usize) -> &DvRouterEngine
	{
		match &self.nodes[index]
		{
			NodeSlot::Router(engine) => engine,
			_ => panic!("node {} is not a DV router", index),
		}
	}

	pub fn switch(&self, index: usize) -> &LearningSwitchEngine
	{
		match &self.nodes[index]
		{
			NodeSlot::Switch(engine) => engine,
			_ => panic!("node {} is not a learning switch", index),
		}
	}

	pub fn deliveries(&self) -> &[Delivery]
	{
		&self.deliveries
	}

	/// Connects `(node_a, port_a)` to `(node_b, port_b)` symmetrically with
	/// `latency`, then raises the link-up event on whichever ends are routers or
	/// switches (§4.5 item 2). If one end is a host, the other end additionally
	/// receives the implicit host-discovery packet attach triggers (§6).
	pub fn add_link(&mut self, node_a: usize, port_a: usize, node_b: usize, port_b: usize, latency: Time)
	{
		self.links.insert((node_a, port_a), (node_b, port_b, latency));
		self.links.insert((node_b, port_b), (node_a, port_a, latency));
		self.raise_link_up(node_a, port_a, latency);
		self.raise_link_up(node_b, port_b, latency);

		if let NodeSlot::Host(host) = self.nodes[node_a]
		{
			self.deliver_now(node_b, port_b, Envelope { src: NodeId(node_a), dst: NodeId(node_b), trace: Vec::new(), ttl: u32::MAX, kind: PacketKind::HostDiscovery { host } });
		}
		if let NodeSlot::Host(host) = self.nodes[node_b]
		{
			self.deliver_now(node_a, port_a, Envelope { src: NodeId(node_b), dst: NodeId(node_a), trace: Vec::new(), ttl: u32::MAX, kind: PacketKind::HostDiscovery { host } });
		}
	}

	fn raise_link_up(&mut self, node: usize, port: usize, latency: Time)
	{
		let now = self.clock;
		match &mut self.nodes[node]
		{
			NodeSlot::Router(engine) =>
			{
				let actions = engine.handle_link_up(port, latency, now);
				self.process_actions(node, actions);
			}
			NodeSlot::Switch(engine) => engine.handle_link_up(port, latency, now),
			NodeSlot::Host(_) => {}
		}
	}

	/// Brings `(node, port)` down on both ends of whatever link occupies it
	/// (§4.5 item 3).
	pub fn link_down(&mut self, node: usize, port: usize)
	{
		let Some(&(peer_node, peer_port, _)) = self.links.get(&(node, port)) else { return };
		self.links.remove(&(node, port));
		self.links.remove(&(peer_node, peer_port));
		self.raise_link_down(node, port);
		self.raise_link_down(peer_node, peer_port);
	}

	fn raise_link_down(&mut self, node: usize, port: usize)
	{
		let now = self.clock;
		match &mut self.nodes[node]
		{
			NodeSlot::Router(engine) =>
			{
				let actions = engine.handle_link_down(port, now);
				self.process_actions(node, actions);
			}
			NodeSlot::Switch(engine) => engine.handle_link_down(port, now),
			NodeSlot::Host(_) => {}
		}
	}

	/// Injects a data packet as if a host had just sent it out its one
	/// connected port.
	pub fn send_data(&mut self, from_host_node: usize, destination: HostId, payload: Vec<u8>)
	{
		let Some((&(_, port), &(to_node, to_port, latency))) = self.links.iter().find(|((node, _), _)| *node == from_host_node) else {
			return;
		};
		let envelope = Envelope {
			src: NodeId(from_host_node),
			dst: NodeId(to_node),
			trace: Vec::new(),
			ttl: u32::MAX,
			kind: PacketKind::Data(DataPacket { destination, payload }),
		};
		let _ = port;
		self.schedule(self.clock + latency, EventPayload::Deliver { to: to_node, in_port: to_port, envelope });
	}

	fn deliver_now(&mut self, to: usize, in_port: usize, envelope: Envelope)
	{
		let now = self.clock;
		self.schedule(now, EventPayload::Deliver { to, in_port, envelope });
	}

	fn schedule(&mut self, due: Time, payload: EventPayload)
	{
		self.seq += 1;
		self.events.push(ScheduledEvent { due, seq: self.seq, payload });
	}

	fn process_actions(&mut self, node: usize, actions: Vec<EngineAction>)
	{
		let now = self.clock;
		for action in actions
		{
			match action
			{
				EngineAction::Send { port, kind } =>
				{
					if let Some(&(to_node, to_port, latency)) = self.links.get(&(node, port))
					{
						let envelope = Envelope { src: NodeId(node), dst: NodeId(to_node), trace: Vec::new(), ttl: u32::MAX, kind };
						self.schedule(now + latency, EventPayload::Deliver { to: to_node, in_port: to_port, envelope });
					}
				}
				EngineAction::ScheduleTimer { interval, recurring, kind } =>
				{
					self.schedule(now + interval, EventPayload::Timer { to: node, kind, interval, recurring });
				}
			}
		}
	}

	/// Runs every event due at or before `end_time`, advancing the virtual clock
	/// as it goes.
	pub fn run_until(&mut self, end_time: Time)
	{
		while let Some(event) = self.events.peek()
		{
			if event.due > end_time
			{
				break;
			}
			let event = self.events.pop().expect("just peeked");
			self.clock = event.due;
			match event.payload
			{
				EventPayload::Deliver { to, in_port, envelope } => self.dispatch_deliver(to, in_port, envelope),
				EventPayload::Timer { to, kind, interval, recurring } => self.dispatch_timer(to, kind, interval, recurring),
			}
		}
		self.clock = self.clock.max(end_time);
	}

	fn dispatch_deliver(&mut self, to: usize, in_port: usize, envelope: Envelope)
	{
		let now = self.clock;
		match &mut self.nodes[to]
		{
			NodeSlot::Router(engine) =>
			{
				let actions = engine.handle_rx(&envelope, in_port, now);
				self.process_actions(to, actions);
			}
			NodeSlot::Switch(engine) =>
			{
				let actions = engine.handle_rx(&envelope, in_port, now);
				self.process_actions(to, actions);
			}
			NodeSlot::Host(_) =>
			{
				if let PacketKind::Data(data) = envelope.kind
				{
					self.deliveries.push(Delivery { at: now, destination: data.destination, payload: data.payload });
				}
			}
		}
	}

	fn dispatch_timer(&mut self, to: usize, kind: TimerKind, interval: Time, recurring: bool)
	{
		let now = self.clock;
		match &mut self.nodes[to]
		{
			NodeSlot::Router(engine) =>
			{
				let actions = match kind
				{
					TimerKind::Start => engine.handle_timer_start(),
					TimerKind::Periodic => engine.handle_timer(now),
				};
				self.process_actions(to, actions);
			}
			NodeSlot::Switch(engine) =>
			{
				engine.handle_timer(now);
			}
			NodeSlot::Host(_) => {}
		}
		if recurring && matches!(kind, TimerKind::Periodic)
		{
			self.schedule(now + interval, EventPayload::Timer { to, kind, interval, recurring });
		}
	}
}

impl Default for Harness
{
	fn default() -> Self
	{
		Self::new()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::policy::Config;
	use rand::{rngs::StdRng, SeedableRng};

	fn policy() -> PolicyConfig
	{
		Config::new().freeze().unwrap()
	}

	#[test]
	fn two_router_chain_converges_and_forwards_exactly_once_per_hop()
	{
		let mut rng = StdRng::seed_from_u64(1);
		let mut harness = Harness::new();
		let r1 = harness.add_router(policy(), &mut rng);
		let r2 = harness.add_router(policy(), &mut rng);
		let h1 = harness.add_host(HostId(1));
		let h2 = harness.add_host(HostId(2));

		harness.add_link(h1, 0, r1, 0, 1.0);
		harness.add_link(r1, 1, r2, 0, 1.0);
		harness.add_link(r2, 1, h2, 0, 1.0);

		harness.run_until(policy().periodic_interval + 1.0);

		let entry_r1 = harness.router(r1).table().get(&HostId(2)).expect("R1 should know about h2");
		assert_eq!(entry_r1.port, 1);
		assert_eq!(entry_r1.latency, 2.0);

		let entry_r2 = harness.router(r2).table().get(&HostId(1)).expect("R2 should know about h1");
		assert_eq!(entry_r2.port, 0);
		assert_eq!(entry_r2.latency, 2.0);

		harness.send_data(h1, HostId(2), vec![42]);
		harness.run_until(harness.now() + 10.0);

		assert_eq!(harness.deliveries().len(), 1);
		assert_eq!(harness.deliveries()[0].destination, HostId(2));
		assert_eq!(harness.deliveries()[0].payload, vec![42]);
	}

	#[test]
	fn link_down_poisons_route_immediately_with_a_fresh_ttl()
	{
		let mut rng = StdRng::seed_from_u64(2);
		let mut harness = Harness::new();
		let r1 = harness.add_router(policy(), &mut rng);
		let r2 = harness.add_router(policy(), &mut rng);
		let h2 = harness.add_host(HostId(2));

		harness.add_link(r1, 0, r2, 0, 1.0);
		harness.add_link(r2, 1, h2, 0, 1.0);
		harness.run_until(1.0);

		assert!(harness.router(r1).table().get(&HostId(2)).unwrap().latency < harness.router(r1).policy().infinity);

		harness.link_down(r1, 0);
		let now = harness.now();
		let entry = harness.router(r1).table().get(&HostId(2)).unwrap();
		assert_eq!(entry.latency, harness.router(r1).policy().infinity);
		assert_eq!(entry.expire_time, now + harness.router(r1).policy().route_ttl);
	}
}
