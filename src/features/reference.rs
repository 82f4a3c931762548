//! Background distribution for attribution: feature columns of the table.

use super::{Feature, FeatureVector, FEATURE_COUNT};
use crate::data::Table;
use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct ReferencePopulation {
    rows: Array2<f64>,
    /// Table rows left out for a missing or non-finite feature
    excluded: usize,
}

impl ReferencePopulation {
    /// All rows with a complete, finite feature vector.
    pub fn from_table(table: &Table) -> Self {
        let vectors: Vec<FeatureVector> = table
            .records()
            .iter()
            .filter_map(|r| FeatureVector::from_record(r).ok())
            .collect();
        let excluded = table.len() - vectors.len();
        if excluded > 0 {
            tracing::warn!(
                excluded,
                kept = vectors.len(),
                "incomplete rows left out of the reference population"
            );
        }
        Self {
            excluded,
            ..Self::from_vectors(&vectors)
        }
    }

    /// At most `max_rows` complete rows, drawn without replacement with a fixed
    /// seed. Rows keep table order. `max_rows == 0` keeps everything.
    pub fn sampled(table: &Table, max_rows: usize, seed: u64) -> Self {
        let full = Self::from_table(table);
        if max_rows == 0 || full.len() <= max_rows {
            return full;
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut picked = rand::seq::index::sample(&mut rng, full.len(), max_rows).into_vec();
        picked.sort_unstable();
        tracing::debug!(total = full.len(), kept = max_rows, seed, "reference population capped");
        Self {
            rows: full.rows.select(Axis(0), &picked),
            excluded: full.excluded,
        }
    }

    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let mut rows = Array2::zeros((vectors.len(), FEATURE_COUNT));
        for (mut row, v) in rows.rows_mut().into_iter().zip(vectors) {
            for (cell, x) in row.iter_mut().zip(v.values()) {
                *cell = *x;
            }
        }
        Self { rows, excluded: 0 }
    }

    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    /// Table rows dropped for incompleteness, before any cap.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    pub fn rows(&self) -> &Array2<f64> {
        &self.rows
    }

    pub fn row(&self, i: usize) -> [f64; FEATURE_COUNT] {
        to_array(self.rows.row(i))
    }

    /// Per-feature mean, `None` when the population is empty.
    pub fn column_means(&self) -> Option<[f64; FEATURE_COUNT]> {
        self.rows.mean_axis(Axis(0)).map(|m| to_array(m.view()))
    }

    pub fn column(&self, feature: Feature) -> ArrayView1<'_, f64> {
        self.rows.column(feature.index())
    }
}

fn to_array(view: ArrayView1<'_, f64>) -> [f64; FEATURE_COUNT] {
    let mut out = [0.0; FEATURE_COUNT];
    for (o, x) in out.iter_mut().zip(view.iter()) {
        *o = *x;
    }
    out
}
