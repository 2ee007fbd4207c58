//! Cell text → property value
//!
//! Scalar properties take the cell text verbatim. Repeating properties use a
//! small encoding of row/field assignments:
//!
//! ```text
//! 1 Row;AssignmentsOnEnteringStateVariableName;ModelEntity.Picture~AssignmentsOnEnteringNewValue;1
//! ```
//!
//! Segments are separated by `~`, fields within a segment by `;`. In every
//! segment with at least two fields the last field is the value, the one
//! before it the sub-property name, and the one before that (if present) a
//! 1-based row number. When the first segment has more than two fields its
//! first field is also the property's own header value.

use crate::error::PropertyError;
use crate::types::{Property, RepeatingProperty};

const SEGMENT_SEPARATOR: char = '~';
const FIELD_SEPARATOR: char = ';';

/// Assign `cell_text` to `property`.
///
/// On failure the property may be partially updated; the error names the
/// property, the raw cell text and the cause.
pub fn decode(property: &mut Property, cell_text: &str) -> Result<(), PropertyError> {
    if property.is_repeating() {
        decode_repeating(property, cell_text)
    } else {
        property.set_value(cell_text)
    }
}

fn decode_repeating(property: &mut Property, cell_text: &str) -> Result<(), PropertyError> {
    let Property {
        name,
        value,
        repeating: Some(table),
        ..
    } = property
    else {
        return Ok(());
    };

    let mut previous_row: i64 = -1;

    for (index, segment) in cell_text.split(SEGMENT_SEPARATOR).enumerate() {
        let fields: Vec<&str> = segment.split(FIELD_SEPARATOR).collect();
        let count = fields.len();

        // Header value; the same segment may still carry a row assignment
        if index == 0 && count > 2 {
            *value = fields[0].to_string();
        }

        if count < 2 {
            continue;
        }

        let field_value = fields[count - 1];
        let field_name = fields[count - 2];
        let row_number = if count > 2 {
            fields[count - 3].trim().parse::<i32>().ok()
        } else {
            None
        };

        let row = target_row(table, row_number, &mut previous_row)
            .map_err(|reason| PropertyError::new(name.as_str(), cell_text, reason))?;

        if let Some(field) = table.rows[row].field_mut(field_name) {
            field.set_value(field_value).map_err(|e| {
                PropertyError::new(name.as_str(), cell_text, format!("{}: {}", field_name, e.reason))
            })?;
        }
    }

    Ok(())
}

/// Pick the row a field assignment lands in, creating it when needed.
///
/// A row number only moves forward: it is honoured when greater than the
/// last one honoured in this cell, otherwise the last row is reused.
fn target_row(
    table: &mut RepeatingProperty,
    row_number: Option<i32>,
    previous_row: &mut i64,
) -> Result<usize, String> {
    match row_number {
        Some(number) if i64::from(number) > *previous_row => {
            *previous_row = i64::from(number);
            if number as usize > table.row_count() {
                table.create_row();
                Ok(table.row_count() - 1)
            } else if number >= 1 {
                Ok(number as usize - 1)
            } else {
                Err(format!("Row {} is out of range", number))
            }
        }
        _ => {
            if table.row_count() == 0 {
                table.create_row();
            }
            Ok(table.row_count() - 1)
        }
    }
}
