//! Merge-join presence check over two sorted name lists.
//!
//! Given a reference list (e.g. every channel name) and a sparse list
//! (e.g. the channels one user is in), produce one marker per reference
//! entry saying whether the sparse list has it. Both lists must be sorted
//! the same way; a single pass over both replaces a hash lookup.
//!
//! ```text
//! reference:  [a    b    c    d ]
//! sparse:     [a         c      ]
//! result:     [yes  no   yes  no]
//! ```

use std::fmt;

/// Cell marker in a presence matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    pub fn is_present(self) -> bool {
        self == Presence::Present
    }

    pub fn marker(self) -> &'static str {
        match self {
            Presence::Present => "✅",
            Presence::Absent => "❌",
        }
    }
}

impl From<bool> for Presence {
    fn from(present: bool) -> Self {
        if present {
            Presence::Present
        } else {
            Presence::Absent
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Which input broke the ordering precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reference,
    Sparse,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reference => write!(f, "reference"),
            Side::Sparse => write!(f, "sparse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("{side} list is not sorted: {previous:?} comes before {next:?}")]
    Unsorted {
        side: Side,
        previous: String,
        next: String,
    },
}

fn ensure_sorted<S: AsRef<str>>(list: &[S], side: Side) -> Result<(), ReconcileError> {
    match list.windows(2).find(|w| w[0].as_ref() > w[1].as_ref()) {
        Some(w) => Err(ReconcileError::Unsorted {
            side,
            previous: w[0].as_ref().to_string(),
            next: w[1].as_ref().to_string(),
        }),
        None => Ok(()),
    }
}

/// Mark each `reference` entry `present` or `absent` depending on whether
/// `sparse` contains it.
///
/// The output always has `reference.len()` entries. Entries of `sparse`
/// missing from `reference` are not an error: the merge stops advancing
/// at the first one, so it and everything after it in `sparse` is
/// ignored. Callers that need those later entries matched must drop
/// unknown names from `sparse` first.
///
/// # Errors
/// Returns [`ReconcileError::Unsorted`] when either list is not in
/// ascending order. Equal neighbours are allowed.
pub fn reconcile<R, S, M>(
    reference: &[R],
    sparse: &[S],
    present: M,
    absent: M,
) -> Result<Vec<M>, ReconcileError>
where
    R: AsRef<str>,
    S: AsRef<str>,
    M: Clone,
{
    ensure_sorted(reference, Side::Reference)?;
    ensure_sorted(sparse, Side::Sparse)?;

    let mut next = 0;
    let marks = reference
        .iter()
        .map(|name| {
            if next < sparse.len() && name.as_ref() == sparse[next].as_ref() {
                next += 1;
                present.clone()
            } else {
                absent.clone()
            }
        })
        .collect();
    Ok(marks)
}

/// [`reconcile`] with [`Presence`] markers.
pub fn presence<R, S>(reference: &[R], sparse: &[S]) -> Result<Vec<Presence>, ReconcileError>
where
    R: AsRef<str>,
    S: AsRef<str>,
{
    reconcile(reference, sparse, Presence::Present, Presence::Absent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YES: &str = "✅";
    const NO: &str = "❌";

    #[test]
    fn marks_every_other_entry() {
        let got = reconcile(&["a", "b", "c", "d"], &["a", "c"], YES, NO).unwrap();
        assert_eq!(got, [YES, NO, YES, NO]);
    }

    #[test]
    fn sparse_not_a_subset_still_works() {
        let got = reconcile(&["a", "b"], &["a", "c"], YES, NO).unwrap();
        assert_eq!(got, [YES, NO]);
    }

    #[test]
    fn unmatched_sparse_entry_stops_the_merge() {
        // "b" is not in the reference, so "c" behind it is never reached.
        let got = reconcile(&["a", "c"], &["b", "c"], YES, NO).unwrap();
        assert_eq!(got, [NO, NO]);
    }

    #[test]
    fn empty_sparse_is_all_absent() {
        let none: [&str; 0] = [];
        let got = reconcile(&["a", "b", "c"], &none, YES, NO).unwrap();
        assert_eq!(got, [NO, NO, NO]);
    }

    #[test]
    fn identical_lists_are_all_present() {
        let names = ["alpha", "beta", "gamma"];
        let got = reconcile(&names, &names, YES, NO).unwrap();
        assert_eq!(got, [YES, YES, YES]);
    }

    #[test]
    fn empty_reference_gives_empty_output() {
        let none: [&str; 0] = [];
        assert!(reconcile(&none, &["a"], YES, NO).unwrap().is_empty());
    }

    #[test]
    fn output_length_matches_reference() {
        let reference: Vec<String> = (0..50).map(|i| format!("n{i:02}")).collect();
        for step in 1..7 {
            let sparse: Vec<&String> = reference.iter().step_by(step).collect();
            let got = presence(&reference, &sparse).unwrap();
            assert_eq!(got.len(), reference.len());
            assert_eq!(got.iter().filter(|p| p.is_present()).count(), sparse.len());
        }
    }

    #[test]
    fn duplicates_are_allowed() {
        let got = presence(&["a", "a", "b"], &["a", "b"]).unwrap();
        assert_eq!(got, [Presence::Present, Presence::Absent, Presence::Present]);
    }

    #[test]
    fn unsorted_reference_is_rejected() {
        let err = presence(&["b", "a"], &["a"]).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::Unsorted {
                side: Side::Reference,
                previous: "b".into(),
                next: "a".into(),
            }
        );
    }

    #[test]
    fn unsorted_sparse_is_rejected() {
        let err = presence(&["a", "b", "c"], &["c", "a"]).unwrap_err();
        assert!(matches!(err, ReconcileError::Unsorted { side: Side::Sparse, .. }));
        assert_eq!(err.to_string(), r#"sparse list is not sorted: "c" comes before "a""#);
    }

    #[test]
    fn presence_markers() {
        assert_eq!(Presence::from(true).to_string(), YES);
        assert_eq!(Presence::from(false).to_string(), NO);
    }
}
