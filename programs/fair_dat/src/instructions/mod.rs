//! Trust instructions
//! Each instruction validates everything before it mutates the trust

pub mod initialize;
pub mod buy;
pub mod sell;
pub mod estimate_sell_value;
pub mod cancel;
pub mod close;

#[allow(ambiguous_glob_reexports)]
pub use initialize::*;
#[allow(ambiguous_glob_reexports)]
pub use buy::*;
#[allow(ambiguous_glob_reexports)]
pub use sell::*;
#[allow(ambiguous_glob_reexports)]
pub use estimate_sell_value::*;
#[allow(ambiguous_glob_reexports)]
pub use cancel::*;
#[allow(ambiguous_glob_reexports)]
pub use close::*;
