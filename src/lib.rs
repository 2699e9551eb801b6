// codeplug-rs: vendor-neutral radio codeplug translation core

pub mod bitwise;
pub mod codeplug;
pub mod config;
pub mod context;
pub mod drivers;
pub mod memmap;
pub mod signaling;

// Re-export commonly used types
pub use bitwise::Element;
pub use codeplug::{Codeplug, CodeplugError, Diagnostic, ErrorStack, Flags};
pub use config::{Channel, Config, Contact};
pub use context::{Context, ObjectKind};
pub use drivers::{list_drivers, register_builtin, DriverInfo};
pub use memmap::{Image, RawBuffer};
pub use signaling::SelectiveCall;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
