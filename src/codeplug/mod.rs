// Device codec trait and the shared encode/decode lifecycle.
//
// A device codec owns a sparse `Image` of its memory layout and knows how to
// translate between that image and the abstract `Config`. The phase order is
// fixed here so every codec indexes before it allocates and allocates before
// it writes; codecs only fill in the per-phase behaviour.

use crate::config::Config;
use crate::context::{Context, ContextError};
use crate::memmap::{Image, ImageError};
use crate::bitwise::Element;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeplugError {
    #[error("index collision: {0}")]
    IndexCollision(#[from] ContextError),

    #[error("image layout error: {0}")]
    Image(#[from] ImageError),

    #[error("required region {address:#010x}+{size:#x} is not allocated")]
    MissingRegion { address: u32, size: usize },

    #[error("invalid codeplug image: {0}")]
    InvalidImage(String),

    #[error("too many {kind}: {count} exceeds device limit {limit}")]
    CapacityExceeded {
        kind: &'static str,
        count: usize,
        limit: usize,
    },
}

pub type Result<T> = std::result::Result<T, CodeplugError>;

/// Options controlling how a configuration is written into an image.
#[derive(Debug, Clone, Copy)]
pub struct Flags {
    /// Update a previously downloaded codeplug in place, preserving every
    /// byte this codec does not model, instead of starting from power-on
    /// defaults.
    pub update_codeplug: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            update_codeplug: true,
        }
    }
}

/// One structural problem found during a translation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub operation: String,
    pub address: Option<u32>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(addr) => write!(f, "{} @ {:#010x}: {}", self.operation, addr, self.message),
            None => write!(f, "{}: {}", self.operation, self.message),
        }
    }
}

/// Accumulates every hard failure of a run so the caller sees all of them,
/// not just the first. Soft degradations go to the log instead.
#[derive(Debug, Default)]
pub struct ErrorStack {
    entries: Vec<Diagnostic>,
}

impl ErrorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: &str, address: Option<u32>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            operation: operation.to_string(),
            address,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl fmt::Display for ErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Presence bitmap over an element: bit i of byte i/8, LSB first.
pub struct BitmapElement<T> {
    element: Element<T>,
}

impl<T: AsRef<[u8]>> BitmapElement<T> {
    pub fn new(element: Element<T>) -> Self {
        Self { element }
    }

    /// Whether entry `i` is marked present.
    pub fn is_encoded(&self, i: usize) -> bool {
        self.element.get_bit(i / 8, (i % 8) as u8)
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> BitmapElement<T> {
    pub fn enable(&mut self, i: usize) {
        self.element.set_bit(i / 8, (i % 8) as u8, true);
    }

    pub fn disable(&mut self, i: usize) {
        self.element.set_bit(i / 8, (i % 8) as u8, false);
    }

    /// Clear the whole bitmap.
    pub fn clear(&mut self) {
        self.element.fill(0x00);
    }

    /// Mark entries 0..n present, everything else absent.
    pub fn enable_first(&mut self, n: usize) {
        self.clear();
        for i in 0..n {
            self.enable(i);
        }
    }
}

/// Presence bytemap over an element: one byte per entry, inverted
/// polarity. 0xff marks an empty slot, 0x00 an encoded one. Some banks use
/// this form instead of a bit-per-entry bitmap.
pub struct BytemapElement<T> {
    element: Element<T>,
}

impl<T: AsRef<[u8]>> BytemapElement<T> {
    pub fn new(element: Element<T>) -> Self {
        Self { element }
    }

    /// Whether entry `i` is marked present.
    pub fn is_encoded(&self, i: usize) -> bool {
        i < self.element.size() && self.element.get_u8(i) == 0x00
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> BytemapElement<T> {
    pub fn enable(&mut self, i: usize) {
        self.element.set_u8(i, 0x00);
    }

    pub fn disable(&mut self, i: usize) {
        self.element.set_u8(i, 0xff);
    }

    /// Mark every entry empty.
    pub fn clear(&mut self) {
        self.element.fill(0xff);
    }

    /// Mark entries 0..n present, everything else absent.
    pub fn enable_first(&mut self, n: usize) {
        self.clear();
        for i in 0..n {
            self.enable(i);
        }
    }
}

/// A binary codeplug codec for one radio model.
pub trait Codeplug {
    fn image(&self) -> &Image;
    fn image_mut(&mut self) -> &mut Image;

    /// Assign device indices to every configuration object.
    fn index(&self, config: &Config, ctx: &mut Context, err: &mut ErrorStack) -> Result<()>;

    /// Allocate the presence bitmaps.
    fn allocate_bitmaps(&mut self) -> Result<()>;

    /// Mark every indexed object present in its bitmap.
    fn set_bitmaps(&mut self, ctx: &Context);

    /// Allocate regions that must be written on every update.
    fn allocate_updated(&mut self) -> Result<()>;

    /// Allocate the regions the indexed objects will be encoded into.
    fn allocate_for_encoding(&mut self, ctx: &Context) -> Result<()>;

    /// Allocate every region a decode needs to inspect. The caller fills the
    /// image afterwards; reading the device is outside this crate.
    fn allocate_for_decoding(&mut self) -> Result<()>;

    /// Write the configuration into the allocated image.
    fn encode_elements(
        &mut self,
        flags: Flags,
        config: &Config,
        ctx: &Context,
        err: &mut ErrorStack,
    ) -> Result<()>;

    /// Build provisional configuration objects from the image, registering
    /// each under its device index. References stay unresolved.
    fn decode_elements(
        &self,
        config: &mut Config,
        ctx: &mut Context,
        err: &mut ErrorStack,
    ) -> Result<()>;

    /// Resolve every raw index into a configuration slot. A dangling index
    /// degrades to "no reference" with a warning, never a hard failure.
    fn link_elements(&self, config: &mut Config, ctx: &Context, err: &mut ErrorStack)
        -> Result<()>;

    /// Full encode run in the mandated phase order.
    fn encode(&mut self, config: &Config, flags: Flags, err: &mut ErrorStack) -> Result<()> {
        let mut ctx = Context::new();
        self.index(config, &mut ctx, err)?;
        self.allocate_bitmaps()?;
        self.set_bitmaps(&ctx);
        if flags.update_codeplug {
            self.allocate_updated()?;
        }
        self.allocate_for_encoding(&ctx)?;
        self.encode_elements(flags, config, &ctx, err)
    }

    /// Full decode run: create objects, then link them. The image must
    /// already be allocated (`allocate_for_decoding`) and filled.
    fn decode(&self, config: &mut Config, err: &mut ErrorStack) -> Result<()> {
        let mut ctx = Context::new();
        self.decode_elements(config, &mut ctx, err)?;
        self.link_elements(config, &ctx, err)
    }
}
