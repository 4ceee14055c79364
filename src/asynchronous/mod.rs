//! Asynchronous HUSB238 drivers
//!
//! [`internal`] owns the bus directly. With the `embassy` feature, [`embassy`] wraps it in a mutex
//! so several tasks can share one chip.
#[cfg(feature = "embassy")]
pub mod embassy;
pub mod internal;
