use serde::{Deserialize, Serialize};

/// Per-category debug logging switches, set from the configuration's
/// `debug:` section.  Everything defaults to off; `RUST_LOG` still
/// gates the subscriber level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DebugFlags {
    pub event: bool,
    pub update: bool,
    pub open: bool,
    pub notification: bool,
    pub keepalive: bool,
    pub fsm: bool,
    pub graceful_restart: bool,
}
