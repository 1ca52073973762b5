pub use crate::app::App;
pub use plugboard_types::prelude::*;

// vim: ts=4
