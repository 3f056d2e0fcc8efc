use sheetfit_core::Rectangle;

use crate::error::LayoutError;
use crate::worksheet::WorksheetModel;

/// Turn on "wrap text" for every cell of `range`. `None` is a no-op.
pub fn apply_wrap(model: &mut dyn WorksheetModel, range: Option<Rectangle>) -> Result<(), LayoutError> {
    let Some(range) = range else {
        return Ok(());
    };
    model.set_range_wrap(&range, true).map_err(LayoutError::Worksheet)?;
    log::debug!("Wrap text applied to {range}");
    Ok(())
}
