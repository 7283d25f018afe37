pub mod inst;
pub use inst::{Message, Speaker};

pub mod adj_out;
pub mod caps;
pub mod change;
pub mod debug;
pub mod md5;
pub mod peer;
pub mod route;
pub mod timer;

pub mod tracing;
