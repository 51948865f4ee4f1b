/*!

Outbound actions an engine requests of its host simulator.

The source lets a `DVRouterBase` call back into the simulator directly
(`self.send(...)`, `api.create_timer(...)`); here, following the shape of
`Eventful::process`, which returns a `Vec<EventGeneration>` instead of driving the
event queue itself, every engine handler *returns* the actions it wants taken
rather than calling back. This keeps an engine a plain, singly-owned value
with no `Rc<RefCell<_>>` self-reference (§5: a router's handlers never run
concurrently with themselves, so nothing requires that weak self-pointer
trick for scheduling).

*/

use crate::packet::PacketKind;
use crate::policy::Time;

/// Which callback a scheduled timer should fire into. The one-shot randomized
/// start delay (§4.5) calls back into a different handler than the periodic tick
/// it sets up, so the two are distinguished explicitly rather than overloading
/// `handle_timer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind
{
	/// Fires once, then the engine's `handle_timer_start` hands back the real
	/// periodic registration.
	Start,
	/// Fires `handle_timer`.
	Periodic,
}

/// A single outbound effect requested by an engine in response to one inbound
/// event. A handler call typically returns several of these (the packets of one
/// advertisement pass). The engine never resolves transport addressing itself —
/// it only names a port and a payload; the harness fills in `Envelope::src`/`dst`
/// from its topology when it delivers the packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction
{
	/// Emit a packet with payload `kind` out `port`.
	Send { port: usize, kind: PacketKind },
	/// Schedule a future callback after `interval` seconds. `recurring` mirrors
	/// `create_timer`'s default (§6).
	ScheduleTimer { interval: Time, recurring: bool, kind: TimerKind },
}
