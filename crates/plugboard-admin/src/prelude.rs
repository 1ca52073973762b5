pub use plugboard_core::prelude::*;

// vim: ts=4
