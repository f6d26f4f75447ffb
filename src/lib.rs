#![doc = include_str!("../README.md")]
#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

mod error;
mod map;
mod raw;
mod utils {
    pub mod arena;
}

pub use self::{error::Error, map::BalancedTree};
