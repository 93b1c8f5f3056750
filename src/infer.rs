//! Column type narrowing: intersecting what a column could be with what each
//! new cell says it can be.

use crate::{convert::get_data_kind, error::ShapeError, kind::TypeMask};

/// Intersect `current` with the kinds `cell` parses as. A missing or blank
/// cell asserts nothing about the column and leaves the mask unchanged.
pub fn narrow(cell: Option<&str>, current: TypeMask) -> TypeMask {
    match cell {
        None => current,
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                current
            } else {
                current.intersect(get_data_kind(trimmed))
            }
        }
    }
}

/// Apply [`narrow`] element-wise across one row. The caller establishes the
/// column count with the first data row; every later row must match it.
pub fn narrow_row(
    cells: &[Option<String>],
    masks: &[TypeMask],
) -> Result<Vec<TypeMask>, ShapeError> {
    if cells.len() != masks.len() {
        return Err(ShapeError::RowWidth {
            expected: masks.len(),
            found: cells.len(),
        });
    }
    Ok(masks
        .iter()
        .zip(cells)
        .map(|(mask, cell)| narrow(cell.as_deref(), *mask))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::DataKind;

    #[test]
    fn blank_cells_leave_the_mask_unchanged() {
        let mask = TypeMask::INTEGRAL;
        assert_eq!(narrow(None, mask), mask);
        assert_eq!(narrow(Some(""), mask), mask);
        assert_eq!(narrow(Some("   "), mask), mask);
    }

    #[test]
    fn narrowing_is_an_intersection() {
        let after_int = narrow(Some("5"), TypeMask::ALL);
        assert!(after_int.contains(DataKind::Short));
        assert!(!after_int.contains(DataKind::Boolean));

        let after_real = narrow(Some("5.5"), after_int);
        assert!(!after_real.contains(DataKind::Short));
        assert!(after_real.contains(DataKind::Double));
        assert!(after_real.contains(DataKind::String));
        assert!(after_int.contains_all(after_real));
    }

    #[test]
    fn string_survives_any_sequence_of_cells() {
        let mut mask = TypeMask::ALL;
        for cell in ["1", "1.1", "true", "zebra", "12/12/2012"] {
            mask = narrow(Some(cell), mask);
        }
        assert_eq!(mask, TypeMask::from(DataKind::String));
    }

    #[test]
    fn narrow_row_rejects_width_mismatch() {
        let masks = vec![TypeMask::ALL; 2];
        let cells = vec![Some("1".to_string())];
        assert_eq!(
            narrow_row(&cells, &masks),
            Err(ShapeError::RowWidth {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn narrow_row_narrows_each_column_independently() {
        let masks = vec![TypeMask::ALL; 2];
        let cells = vec![Some("9".to_string()), None];
        let narrowed = narrow_row(&cells, &masks).expect("matching widths");
        assert!(narrowed[0].contains(DataKind::Integer));
        assert!(!narrowed[0].contains(DataKind::Boolean));
        assert_eq!(narrowed[1], TypeMask::ALL);
    }
}
