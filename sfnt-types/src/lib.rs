//! Common [scalar data types][data types] found in SFNT font binaries.
//!
//! Every type in this crate knows its fixed on-disk width, how to decode
//! itself from big-endian bytes, and how to render itself for display. The
//! rendering is what an inspector shows in the value column next to a field,
//! so it favors readability over round-tripping (`NULL` for absent offsets,
//! a forced fractional digit for fixed-point values, a calendar date for
//! timestamps).
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

mod fixed;
mod glyph_id;
mod longdatetime;
mod offset;
mod scalar;
mod tag;
mod uint24;

pub use fixed::{F2Dot14, Fixed};
pub use glyph_id::GlyphId;
pub use longdatetime::LongDateTime;
pub use offset::{NullableOffset16, NullableOffset32, Offset16, Offset32};
pub use scalar::{ReadScalar, ValueType};
pub use tag::Tag;
pub use uint24::Uint24;
