pub mod typ;
pub use typ::CapCode;

pub mod packet;
pub use packet::{CapabilityHeader, CapabilityPacket};

pub mod emit;
pub use emit::CapEmit;

pub mod mp;
pub use mp::CapMultiProtocol;

pub mod refresh;
pub use refresh::{CapEnhancedRefresh, CapRefresh};

pub mod extend;
pub use extend::CapExtended;

pub mod graceful;
pub use graceful::{CapRestart, RestartValue};

pub mod as4;
pub use as4::CapAs4;

pub mod addpath;
pub use addpath::{AddPathDirection, AddPathValue, CapAddPath};

pub mod unknown;
pub use unknown::CapUnknown;

pub mod summary;
pub use summary::Caps;
