#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// Export the logging macros for either defmt or log
#[macro_use]
mod logging;

pub mod comm;
pub mod consts;
pub mod errors;
pub mod sync;
pub mod transport;
pub mod types;

// Re-exported for implementors
pub use embassy_futures;
pub use embassy_sync;
pub use embassy_time;
pub use embedded_io;
pub use heapless;
pub use postcard;

pub use comm::CommTask;
pub use errors::CommError;
pub use types::{config::CommConfig, message_id::MessageId};

#[macro_export]
macro_rules! const_default {
    ($type:ty => { $($token:tt)+ } ) => {
        impl $crate::ConstDefault for $type {
            const DEFAULT: Self = Self::const_default();
        }

        impl $type {
            pub const fn const_default() -> Self {
                Self { $($token)+ }
            }
        }

        impl Default for $type {
            fn default() -> Self {
                Self::const_default()
            }
        }
    };
}

/// Types with a default value usable in `const` and `static` context.
pub trait ConstDefault {
    const DEFAULT: Self;
}
