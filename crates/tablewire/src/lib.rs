//! Top-level facade crate for tablewire.
//!
//! Re-exports the codec and the capture inspector so users can depend on a single crate.

pub mod core {
    pub use tablewire_core::*;
}

pub mod inspect {
    pub use tablewire_inspect::*;
}
