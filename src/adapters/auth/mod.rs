//! Identity provider adapters.

mod clerk;
mod mock;

pub use clerk::{ClerkAdapter, ClerkConfig};
pub use mock::{MockIdentityAdmin, MockSessionValidator};
