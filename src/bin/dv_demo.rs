//! Demo binary (§10.4): wires the two-router chain and the triangle topologies
//! from the worked scenarios, lets them converge, and prints the resulting
//! routing tables.

use dv_router_sim::harness::Harness;
use dv_router_sim::host::HostId;
use dv_router_sim::policy::Config;
use rand::{rngs::StdRng, SeedableRng};

fn chain_demo()
{
	println!("== two-router chain ==");
	let policy = Config::new().freeze().expect("default policy is valid");
	let mut rng = StdRng::seed_from_u64(7);
	let mut harness = Harness::new();

	let r1 = harness.add_router(policy, &mut rng);
	let r2 = harness.add_router(policy, &mut rng);
	let h1 = harness.add_host(HostId(1));
	let h2 = harness.add_host(HostId(2));

	harness.add_link(h1, 0, r1, 0, 1.0);
	harness.add_link(r1, 1, r2, 0, 1.0);
	harness.add_link(r2, 1, h2, 0, 1.0);

	harness.run_until(policy.periodic_interval * 3.0);

	println!("R1 table:\n{}", harness.router(r1).table().render(harness.now()));
	println!("R2 table:\n{}", harness.router(r2).table().render(harness.now()));
}

fn triangle_demo()
{
	println!("== triangle ==");
	let policy = Config::new().freeze().expect("default policy is valid");
	let mut rng = StdRng::seed_from_u64(11);
	let mut harness = Harness::new();

	let r1 = harness.add_router(policy, &mut rng);
	let r2 = harness.add_router(policy, &mut rng);
	let r3 = harness.add_router(policy, &mut rng);
	let h1 = harness.add_host(HostId(1));
	let h3 = harness.add_host(HostId(3));

	harness.add_link(r1, 0, r2, 0, 1.0);
	harness.add_link(r2, 1, r3, 0, 1.0);
	harness.add_link(r3, 1, r1, 1, 5.0);
	harness.add_link(h1, 0, r1, 2, 1.0);
	harness.add_link(h3, 0, r3, 2, 1.0);

	harness.run_until(policy.periodic_interval * 3.0);

	println!("R1 table:\n{}", harness.router(r1).table().render(harness.now()));
	println!("R2 table:\n{}", harness.router(r2).table().render(harness.now()));
	println!("R3 table:\n{}", harness.router(r3).table().render(harness.now()));
}

fn main()
{
	pretty_env_logger::init();
	chain_demo();
	triangle_demo();
}
