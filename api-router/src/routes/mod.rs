pub mod generate_map;
pub mod probes;
