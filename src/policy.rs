/*!

The configuration surface (§6, §10.3): a fixed, enumerated table of named options,
applied once before any router is instantiated.

This is deliberately much smaller than the `ConfigurationValue`-driven
configuration language — there is no expression grammar or experiment-sweep syntax
to parse here (that machinery, and the CLI plumbing that feeds it, are out of scope
per §1) — but it keeps the same shape: option values arrive as `(name, value)`
string pairs, get validated, and only then produce an immutable record the rest of
the crate consumes by value.

*/

use crate::error::EngineError;

/// Virtual-clock time, in seconds. The simulator's clock is floating point (§6).
pub type Time = f64;

/// Sentinel expire time for static, directly-attached routes (§3). Never evicted by
/// expiry.
pub const FOREVER: Time = Time::INFINITY;

/// The canonical option names from the configuration surface table (§6), in the
/// order they appear there.
pub const OPTION_NAMES: [&str; 11] = [
	"ttl", "pttl", "inf", "period", "sh", "pr", "p", "link-up", "link-down", "unsync", "nohairpin",
];

/// Immutable, `Copy` policy record held by every engine instance. Produced only by
/// `Config::freeze`, which is the one validating constructor (§9: "explicit policy
/// record... configuration mutation after engine creation is forbidden").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyConfig
{
	pub infinity: Time,
	pub route_ttl: Time,
	pub periodic_interval: Time,
	pub split_horizon: bool,
	pub poison_reverse: bool,
	pub poison_expired: bool,
	pub send_on_link_up: bool,
	pub poison_on_link_down: bool,
	pub drop_hairpins: bool,
	pub randomize_timers: bool,
}

impl Default for PolicyConfig
{
	fn default() -> Self
	{
		PolicyConfig {
			infinity: 16.0,
			route_ttl: 15.0,
			periodic_interval: 5.0,
			split_horizon: false,
			poison_reverse: false,
			poison_expired: true,
			send_on_link_up: true,
			poison_on_link_down: true,
			drop_hairpins: false,
			randomize_timers: false,
		}
	}
}

/// Builder for `PolicyConfig`. Accumulates `(name, value)` string pairs exactly as
/// the configuration surface describes them, then validates and freezes into an
/// immutable `PolicyConfig` that can no longer be mutated — `freeze` consumes
/// `self`, so "configuration changed after a node was created" is enforced by
/// ownership as well as by the explicit check in `freeze`.
#[derive(Debug, Clone, Default)]
pub struct Config
{
	values: PolicyConfig,
}

impl Config
{
	pub fn new() -> Self
	{
		Config { values: PolicyConfig::default() }
	}

	/// Parses a boolean the way the configuration surface specifies: the first
	/// character (case-insensitive) being one of `t y 1 e` is true, everything else
	/// — including an empty string — is false.
	fn parse_bool(value: &str) -> bool
	{
		match value.chars().next()
		{
			Some(c) => matches!(c.to_ascii_lowercase(), 't' | 'y' | '1' | 'e'),
			None => false,
		}
	}

	fn parse_real(name: &str, value: &str) -> Result<Time, EngineError>
	{
		value.trim().parse::<Time>().map_err(|_| EngineError::InvalidConfiguration {
			reason: format!("option `{name}` expects a real number, got `{value}`"),
		})
	}

	/// Sets an option by its canonical name (§6). Returns `UnknownOption` for any
	/// name outside the fixed table — `pttl` is accepted (it is reserved, §9 open
	/// question 4) but has no effect on behavior.
	pub fn set(&mut self, name: &str, value: &str) -> Result<(), EngineError>
	{
		match name
		{
			"ttl" => self.values.route_ttl = Self::parse_real(name, value)?,
			"pttl" => { Self::parse_real(name, value)?; }
			"inf" => self.values.infinity = Self::parse_real(name, value)?,
			"period" => self.values.periodic_interval = Self::parse_real(name, value)?,
			"sh" => self.values.split_horizon = Self::parse_bool(value),
			"pr" => self.values.poison_reverse = Self::parse_bool(value),
			"p" => self.values.poison_expired = Self::parse_bool(value),
			"link-up" => self.values.send_on_link_up = Self::parse_bool(value),
			"link-down" => self.values.poison_on_link_down = Self::parse_bool(value),
			"unsync" => self.values.randomize_timers = Self::parse_bool(value),
			"nohairpin" => self.values.drop_hairpins = Self::parse_bool(value),
			_ => return Err(EngineError::UnknownOption { name: name.to_string() }),
		}
		Ok(())
	}

	/// Validates mutual exclusion and produces the immutable record engines hold.
	pub fn freeze(self) -> Result<PolicyConfig, EngineError>
	{
		if self.values.split_horizon && self.values.poison_reverse
		{
			return Err(EngineError::InvalidConfiguration {
				reason: "split horizon and poison reverse cannot both be enabled".to_string(),
			});
		}
		Ok(self.values)
	}
}
