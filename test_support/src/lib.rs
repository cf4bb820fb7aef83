/// utils shared by tests, benches, and the demo binaries
pub mod utils;
