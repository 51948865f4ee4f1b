/*!

The engine's fatal error taxonomy.

Everything else — unknown destinations, poisoned routes, disallowed hairpins — is a
silent data-plane drop and never reaches this type; see the `warn!` log records emitted
at the drop sites instead.

*/

use thiserror::Error;

/// Errors raised by the data model's validated constructors and by the configuration
/// surface. All are fatal to the call that produced them; none are recoverable by the
/// engine itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError
{
	/// A table entry was constructed with a non-numeric or negative latency, or a
	/// non-numeric expiry.
	#[error("invalid table entry: {reason}")]
	InvalidEntry
	{
		reason: String,
	},

	/// `SPLIT_HORIZON` and `POISON_REVERSE` were both requested, or an option was set
	/// after the configuration had already been frozen by a node's construction.
	#[error("invalid configuration: {reason}")]
	InvalidConfiguration
	{
		reason: String,
	},

	/// A configuration option name outside the fixed table in the configuration
	/// surface was looked up.
	#[error("unknown configuration option: {name}")]
	UnknownOption
	{
		name: String,
	},
}
