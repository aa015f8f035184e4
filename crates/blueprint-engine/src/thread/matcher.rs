//! Nearest-thread lookup by CIE76 distance in LAB.

use super::catalog::{DmcThread, ThreadCatalog};
use crate::color::{Lab, Srgb};
use crate::error::EngineError;

/// Runner-up candidates returned beside the best match.
pub const MAX_ALTERNATIVES: usize = 5;

/// A color to match, as supplied by a caller.
///
/// Either form may be present; hex takes precedence when both are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorQuery {
    pub hex: Option<String>,
    pub rgb: Option<[f64; 3]>,
}

impl ColorQuery {
    pub fn hex(hex: impl Into<String>) -> Self {
        Self {
            hex: Some(hex.into()),
            rgb: None,
        }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self {
            hex: None,
            rgb: Some([r, g, b]),
        }
    }

    /// The color this query names.
    ///
    /// RGB components are clamped to 0..=255 and rounded.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] when neither form is present or the
    /// hex is malformed.
    pub fn resolve(&self) -> Result<Srgb, EngineError> {
        match (&self.hex, &self.rgb) {
            (Some(hex), _) => Ok(hex.parse()?),
            (None, Some([r, g, b])) => Ok(Srgb::clamped(*r, *g, *b)),
            (None, None) => Err(EngineError::invalid("provide either rgb or hex")),
        }
    }
}

/// A catalog entry together with its distance from the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadCandidate {
    pub thread: DmcThread,
    /// CIE76 delta E, rounded to two decimals.
    pub delta_e: f64,
}

/// Nearest thread plus the next closest, ascending by delta E.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMatch {
    pub best: ThreadCandidate,
    pub alternatives: Vec<ThreadCandidate>,
}

impl ThreadCatalog {
    /// Rank every thread against `color`.
    ///
    /// Threads at equal (rounded) distance keep dataset order.
    pub fn match_color(&self, color: Srgb) -> ThreadMatch {
        self.match_lab(&Lab::from(color))
    }

    pub fn match_lab(&self, lab: &Lab) -> ThreadMatch {
        let mut ranked: Vec<(usize, f64)> = self
            .threads()
            .iter()
            .enumerate()
            .map(|(i, t)| (i, round2(lab.delta_e76(&t.lab))))
            .collect();
        // stable, so ties keep dataset order
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let candidate = |&(i, delta_e): &(usize, f64)| ThreadCandidate {
            thread: self.threads()[i].clone(),
            delta_e,
        };
        // a catalog is never empty, so ranked[0] exists
        ThreadMatch {
            best: candidate(&ranked[0]),
            alternatives: ranked[1..]
                .iter()
                .take(MAX_ALTERNATIVES)
                .map(candidate)
                .collect(),
        }
    }
}

/// Resolve `query` and match it against `catalog`.
///
/// # Errors
///
/// [`EngineError::DatasetUnavailable`] without a catalog, otherwise any
/// error from [`ColorQuery::resolve`].
pub fn match_thread(
    catalog: Option<&ThreadCatalog>,
    query: &ColorQuery,
) -> Result<ThreadMatch, EngineError> {
    let color = query.resolve()?;
    let catalog = catalog.ok_or_else(|| {
        EngineError::DatasetUnavailable("no thread dataset is loaded".to_string())
    })?;
    Ok(catalog.match_color(color))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
