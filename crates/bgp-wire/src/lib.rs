pub mod packet;
pub use packet::*;

pub mod frame;
pub use frame::*;

pub mod open;
pub use open::*;

pub mod update;
pub use update::*;

pub mod notification;
pub use notification::*;

pub mod refresh;
pub use refresh::*;

pub mod parser;
pub use parser::*;

pub mod afi;
pub use afi::*;

pub mod caps;
pub use caps::*;

pub mod attrs;
pub use attrs::*;

pub mod flowspec;
pub use flowspec::*;

pub mod error;
pub use error::*;

pub mod label;
pub use label::*;

pub mod rd;
pub use rd::*;

pub mod many;
pub use many::many0_complete;

pub mod parse_be;
pub use parse_be::{ParseBe, ParseNlri};
