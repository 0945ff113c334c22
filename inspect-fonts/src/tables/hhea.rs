//! The [Horizontal Header (hhea)](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table.

use crate::error::ReadError;
use crate::parser::Parser;

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let major_version = p.read::<u16>("Major version")?;
    let minor_version = p.read::<u16>("Minor version")?;
    if !(major_version == 1 && minor_version == 0) {
        return Err(ReadError::InvalidVersion);
    }

    p.read::<i16>("Typographic ascent")?;
    p.read::<i16>("Typographic descent")?;
    p.read::<i16>("Typographic line gap")?;
    p.read::<u16>("Maximum advance width")?;
    p.read::<i16>("Minimum left sidebearing")?;
    p.read::<i16>("Minimum right sidebearing")?;
    p.read::<i16>("Maximum X extent")?;
    p.read::<i16>("Caret slope rise")?;
    p.read::<i16>("Caret slope run")?;
    p.read::<i16>("Caret offset")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Reserved")?;
    p.read::<i16>("Metric data format")?;
    p.read::<u16>("Number of horizontal metrics")?;
    Ok(())
}
