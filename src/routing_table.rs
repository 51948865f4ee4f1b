/*!

The routing table (§4.4): a validated map from destination host to `TableEntry`.

Modeled as an opaque wrapper over a `BTreeMap` rather than a bare map — the §9
redesign note explicitly calls out the source's "validated mapping by subclassing a
built-in dictionary" as a pattern to replace with a structure whose only insertion
path enforces the invariant. A `BTreeMap` also gives the deterministic,
sorted-by-destination iteration order §5 asks advertisement passes to have.

*/

use std::collections::BTreeMap;

use crate::host::HostId;
use crate::policy::Time;
use crate::table_entry::TableEntry;

/// A validated `HostId -> TableEntry` map. `insert` is the only mutation path, and it
/// always keys an entry by its own `destination`, so `table[h].destination == h`
/// always holds — there is no separate key argument for it to disagree with.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable
{
	entries: BTreeMap<HostId, TableEntry>,
}

impl RoutingTable
{
	pub fn new() -> Self
	{
		RoutingTable { entries: BTreeMap::new() }
	}

	/// Inserts or replaces the entry for `entry.destination`.
	pub fn insert(&mut self, entry: TableEntry)
	{
		self.entries.insert(entry.destination, entry);
	}

	pub fn get(&self, destination: &HostId) -> Option<&TableEntry>
	{
		self.entries.get(destination)
	}

	pub fn remove(&mut self, destination: &HostId) -> Option<TableEntry>
	{
		self.entries.remove(destination)
	}

	pub fn contains(&self, destination: &HostId) -> bool
	{
		self.entries.contains_key(destination)
	}

	/// Destinations currently present, in sorted order.
	pub fn destinations(&self) -> Vec<HostId>
	{
		self.entries.keys().copied().collect()
	}

	/// Iterates `(destination, entry)` pairs in sorted destination order.
	pub fn iter(&self) -> impl Iterator<Item = (&HostId, &TableEntry)>
	{
		self.entries.iter()
	}

	pub fn len(&self) -> usize
	{
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.entries.is_empty()
	}

	/// Renders the fixed four-column layout `(name, port, latency,
	/// seconds-until-expiry)`, relative to `now` (§4.4). A static,
	/// never-expiring entry renders its seconds column as `inf`; everything
	/// else renders `entry.expire_time - now`, matching the source's
	/// `self.expire_time - api.current_time()`.
	pub fn render(&self, now: Time) -> String
	{
		use std::fmt::Write;
		let mut out = String::new();
		writeln!(out, "{:<6} {:<3} {:<4} sec", "name", "prt", "lat").unwrap();
		writeln!(out, "------ --- ---- -----").unwrap();
		for (destination, entry) in &self.entries
		{
			if entry.is_static()
			{
				writeln!(out, "{:<6} {:<3} {:<4} inf", destination.to_string(), entry.port, entry.latency).unwrap();
			}
			else
			{
				writeln!(out, "{:<6} {:<3} {:<4} {:.2}", destination.to_string(), entry.port, entry.latency, entry.expire_time - now).unwrap();
			}
		}
		out
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::policy::FOREVER;

	#[test]
	fn insert_then_get()
	{
		let mut table = RoutingTable::new();
		let entry = TableEntry::new(HostId(1), 0, 1.0, FOREVER).unwrap();
		table.insert(entry);
		assert_eq!(table.get(&HostId(1)), Some(&entry));
		assert_eq!(table.get(&HostId(2)), None);
	}

	#[test]
	fn insert_replaces_existing_entry_for_same_destination()
	{
		let mut table = RoutingTable::new();
		table.insert(TableEntry::new(HostId(1), 0, 1.0, FOREVER).unwrap());
		table.insert(TableEntry::new(HostId(1), 2, 5.0, FOREVER).unwrap());
		assert_eq!(table.len(), 1);
		assert_eq!(table.get(&HostId(1)).unwrap().port, 2);
	}

	#[test]
	fn every_key_equals_its_entrys_destination()
	{
		let mut table = RoutingTable::new();
		table.insert(TableEntry::new(HostId(3), 1, 2.0, 10.0).unwrap());
		for (key, entry) in table.iter()
		{
			assert_eq!(*key, entry.destination);
		}
	}

	#[test]
	fn render_uses_fixed_four_column_layout()
	{
		let mut table = RoutingTable::new();
		table.insert(TableEntry::new(HostId(1), 0, 2.0, FOREVER).unwrap());
		let rendered = table.render(0.0);
		assert!(rendered.contains("name"));
		assert!(rendered.contains("h1"));
		assert!(rendered.contains("inf"));
	}

	#[test]
	fn render_shows_seconds_until_expiry_relative_to_now()
	{
		let mut table = RoutingTable::new();
		table.insert(TableEntry::new(HostId(1), 0, 2.0, 25.0).unwrap());
		let rendered = table.render(10.0);
		assert!(rendered.contains("15.00"));
	}
}
