//! Repetition peak detection

use tracing::debug;

/// Finds rep peaks in a displacement signal.
///
/// A peak is a local maximum (a flat top counts once, at its middle sample)
/// whose value is at least `height`. Peaks closer than `distance` samples
/// are thinned by keeping the taller one; equal heights keep the earlier
/// index.
#[derive(Debug, Clone, Copy)]
pub struct PeakDetector {
    height: f64,
    distance: usize,
}

impl PeakDetector {
    /// Create a new peak detector
    pub fn new(height: f64, distance: usize) -> Self {
        Self { height, distance }
    }

    /// Peak sample indices in ascending order
    pub fn find(&self, values: &[f64]) -> Vec<usize> {
        let candidates: Vec<usize> = local_maxima(values)
            .into_iter()
            .filter(|&i| values[i] >= self.height)
            .collect();

        let peaks = self.select_by_distance(values, &candidates);

        debug!(
            "Peak detection: {} local maxima above {}, {} after spacing {}",
            candidates.len(),
            self.height,
            peaks.len(),
            self.distance
        );

        peaks
    }

    fn select_by_distance(&self, values: &[f64], candidates: &[usize]) -> Vec<usize> {
        if self.distance <= 1 || candidates.len() < 2 {
            return candidates.to_vec();
        }

        // Tallest first; stable sort keeps earlier indices ahead on ties
        let mut priority: Vec<usize> = (0..candidates.len()).collect();
        priority.sort_by(|&a, &b| values[candidates[b]].total_cmp(&values[candidates[a]]));

        let mut keep = vec![true; candidates.len()];
        for &j in &priority {
            if !keep[j] {
                continue;
            }

            let mut k = j;
            while k > 0 && candidates[j] - candidates[k - 1] < self.distance {
                keep[k - 1] = false;
                k -= 1;
            }

            let mut k = j + 1;
            while k < candidates.len() && candidates[k] - candidates[j] < self.distance {
                keep[k] = false;
                k += 1;
            }
        }

        candidates
            .iter()
            .zip(keep)
            .filter_map(|(&idx, kept)| kept.then_some(idx))
            .collect()
    }
}

/// Indices of local maxima; plateaus report their middle sample (rounded
/// down). The first and last samples are never maxima.
fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if values.len() < 3 {
        return maxima;
    }

    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    maxima
}
