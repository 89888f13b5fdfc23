//! Shared helpers for synaptic tests: graph builders, a scripted completion
//! provider, fixture loading and temporary directories.

pub mod builder;
pub mod fixtures;
pub mod provider;
pub mod temp;

pub use builder::{four_node_graph, GraphBuilder};
pub use fixtures::{
    fixtures_root, load_fixture, load_fixture_text, load_golden_json, update_golden_requested,
    write_golden,
};
pub use provider::ScriptedProvider;
pub use temp::TempDir;
