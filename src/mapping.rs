//! Remapping of per-face fields when the patch topology changes.

use ndarray::prelude::*;
use thiserror::Error;

use crate::{Array2F, ArrayBase2F, DataF, DataMutF};

/// Describes where each face of a resized patch comes from.
///
/// Entry i gives the face of the old patch that new face i is copied from.
/// The same old face may appear several times (split faces). `None` marks a
/// face with no counterpart on the old patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceMapping {
    addressing: Vec<Option<usize>>,
}

impl FaceMapping {
    pub fn new(addressing: Vec<Option<usize>>) -> Self {
        Self { addressing }
    }

    /// Mapping where every new face has a source.
    pub fn direct(addressing: impl IntoIterator<Item = usize>) -> Self {
        Self {
            addressing: addressing.into_iter().map(Some).collect(),
        }
    }

    /// Number of faces after mapping.
    pub fn len(&self) -> usize {
        self.addressing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addressing.is_empty()
    }

    pub fn addressing(&self) -> &[Option<usize>] {
        &self.addressing
    }

    /// Builds the mapped version of a per-face field.
    ///
    /// The result has one row per entry in the mapping. Faces without a valid
    /// source take the value of the nearest mapped face (by index, the lower
    /// one on ties). If no face is mapped the result is zero. Sources past the
    /// end of field count as unmapped.
    pub fn apply<S: DataF>(&self, field: &ArrayBase2F<S>) -> Array2F {
        let n_old = field.nrows();
        let sources: Vec<Option<usize>> = self
            .addressing
            .iter()
            .enumerate()
            .map(|(face, src)| match *src {
                Some(src) if src >= n_old => {
                    log::warn!("Face {face} maps from face {src} of a {n_old} face patch, ignoring");
                    None
                }
                src => src,
            })
            .collect();

        let filled = fill_nearest(&sources);

        let mut out = Array2::zeros([self.len(), field.ncols()]);
        for (mut row, src) in out.rows_mut().into_iter().zip(filled) {
            if let Some(src) = src {
                row.assign(&field.row(src));
            }
        }
        out
    }
}

/// Replaces each `None` with the value of the closest `Some` entry.
fn fill_nearest(sources: &[Option<usize>]) -> Vec<Option<usize>> {
    let n = sources.len();

    // Index of the closest mapped entry at or before/after each position.
    let mut before = vec![None; n];
    let mut last = None;
    for i in 0..n {
        if sources[i].is_some() {
            last = Some(i);
        }
        before[i] = last;
    }
    let mut after = vec![None; n];
    let mut next = None;
    for i in (0..n).rev() {
        if sources[i].is_some() {
            next = Some(i);
        }
        after[i] = next;
    }

    (0..n)
        .map(|i| {
            let nearest = match (before[i], after[i]) {
                (Some(b), Some(a)) => {
                    if i - b <= a - i {
                        Some(b)
                    } else {
                        Some(a)
                    }
                }
                (b, a) => b.or(a),
            };
            nearest.and_then(|j| sources[j])
        })
        .collect()
}

/// Error type for [reverse_map].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MappingError {
    #[error("addressing has {addressing} entries but the source field has {faces} faces")]
    Length { addressing: usize, faces: usize },
    #[error("face {face} maps to face {target} of a {len} face patch")]
    OutOfRange { face: usize, target: usize, len: usize },
    #[error("source field has {source_cols} components, target has {target_cols}")]
    Components { source_cols: usize, target_cols: usize },
}

/// Writes face i of source into face addressing\[i\] of target.
///
/// The addressing is checked in full before anything is written, so target
/// is left untouched on error.
pub fn reverse_map<ST: DataMutF, SS: DataF>(
    target: &mut ArrayBase2F<ST>,
    source: &ArrayBase2F<SS>,
    addressing: &[usize],
) -> Result<(), MappingError> {
    if addressing.len() != source.nrows() {
        return Err(MappingError::Length {
            addressing: addressing.len(),
            faces: source.nrows(),
        });
    }
    if source.ncols() != target.ncols() {
        return Err(MappingError::Components {
            source_cols: source.ncols(),
            target_cols: target.ncols(),
        });
    }
    let len = target.nrows();
    if let Some((face, &dest)) = addressing.iter().enumerate().find(|&(_, &t)| t >= len) {
        return Err(MappingError::OutOfRange {
            face,
            target: dest,
            len,
        });
    }

    for (row, &dest) in source.rows().into_iter().zip(addressing) {
        target.row_mut(dest).assign(&row);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Array2F {
        array![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]]
    }

    #[test]
    fn test_direct_mapping() {
        // Reorder, drop face 1 and split face 2.
        let mapping = FaceMapping::direct([2, 0, 2]);
        let mapped = mapping.apply(&field());
        assert_eq!(
            mapped,
            array![[3.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_unmapped_faces_take_nearest() {
        let mapping = FaceMapping::new(vec![None, Some(1), None, None, None, Some(2), None]);
        let mapped = mapping.apply(&field());
        assert_eq!(
            mapped.column(0),
            array![2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0]
        );
    }

    #[test_log::test]
    fn test_out_of_range_source() {
        let mapping = FaceMapping::new(vec![Some(0), Some(7), Some(2)]);
        let mapped = mapping.apply(&field());
        // Face 1 is equally far from faces 0 and 2 and takes the lower one.
        assert_eq!(mapped.column(0), array![1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_nothing_mapped() {
        let mapping = FaceMapping::new(vec![None, None]);
        assert_eq!(mapping.apply(&field()), Array2F::zeros([2, 3]));

        let mapping = FaceMapping::direct([0, 1]);
        let empty = Array2F::zeros([0, 3]);
        assert_eq!(mapping.apply(&empty), Array2F::zeros([2, 3]));

        let mapping = FaceMapping::default();
        assert_eq!(mapping.apply(&field()).dim(), (0, 3));
    }

    #[test]
    fn test_reverse_map() {
        let mut target = Array2F::zeros([4, 3]);
        let source = array![[5.0, 6.0, 7.0], [8.0, 9.0, 10.0]];

        reverse_map(&mut target, &source, &[3, 1]).unwrap();
        assert_eq!(target.row(3), source.row(0));
        assert_eq!(target.row(1), source.row(1));
        assert_eq!(target.row(0), array![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reverse_map_errors() {
        let mut target = Array2F::zeros([2, 3]);
        let source = array![[5.0, 6.0, 7.0], [8.0, 9.0, 10.0]];

        assert_eq!(
            reverse_map(&mut target, &source, &[0]),
            Err(MappingError::Length {
                addressing: 1,
                faces: 2
            })
        );
        assert_eq!(
            reverse_map(&mut target, &source, &[0, 2]),
            Err(MappingError::OutOfRange {
                face: 1,
                target: 2,
                len: 2
            })
        );
        // Nothing was written by the failed calls.
        assert_eq!(target, Array2F::zeros([2, 3]));

        let mut narrow = Array2F::zeros([2, 2]);
        assert!(matches!(
            reverse_map(&mut narrow, &source, &[0, 1]),
            Err(MappingError::Components { .. })
        ));
    }
}
