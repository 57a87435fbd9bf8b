// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> Option<f64> {
    let len = sorted_data.len();
    if len == 0 {
        return None;
    }
    if len == 1 {
        return Some(sorted_data[0]);
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted_data[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
}

/// Sort finite values ascending, discarding NaN and infinities.
pub fn sorted_finite(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.into_iter().filter(|x| x.is_finite()).collect();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

// ── Histogram helpers ─────────────────────────────────────────────────────────

/// `bins + 1` equal-width edges spanning `[min, max]`.
///
/// A zero-width range is widened to `[min - 0.5, max + 0.5]` so every bin
/// keeps a positive width.
pub fn equal_width_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    edges
}

/// Bin index of `value` for the given ascending `edges`.
///
/// Bins are half-open `[a, b)` except the last one, which also includes its
/// upper edge. Values outside the edges return `None`.
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let bins = edges.len().checked_sub(1)?;
    if bins == 0 {
        return None;
    }
    let (lo, hi) = (edges[0], edges[bins]);
    if value < lo || value > hi {
        return None;
    }
    if value == hi {
        return Some(bins - 1);
    }
    let idx = edges.partition_point(|&e| e <= value).saturating_sub(1);
    Some(idx.min(bins - 1))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty_returns_none() {
        assert_eq!(percentile(&[], 90.0), None);
    }

    #[test]
    fn test_percentile_single_element() {
        assert_eq!(percentile(&[42.0], 5.0), Some(42.0));
        assert_eq!(percentile(&[42.0], 95.0), Some(42.0));
    }

    #[test]
    fn test_percentile_p50_even() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        // rank = 0.5 * 3 = 1.5 → interpolate between data[1]=2 and data[2]=3
        assert!((percentile(&data, 50.0).unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_bounds() {
        let data = vec![10.0, 20.0, 30.0];
        assert_eq!(percentile(&data, 0.0), Some(10.0));
        assert_eq!(percentile(&data, 100.0), Some(30.0));
    }

    #[test]
    fn test_percentile_p5_p95_hundred_points() {
        let data: Vec<f64> = (1..=100).map(|x| x as f64 * 10.0).collect();
        // rank 4.95 → 50 + 0.95 * 10
        assert!((percentile(&data, 5.0).unwrap() - 59.5).abs() < 1e-9);
        // rank 94.05 → 950 + 0.05 * 10
        assert!((percentile(&data, 95.0).unwrap() - 950.5).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_finite_drops_nan() {
        let v = sorted_finite(vec![3.0, f64::NAN, 1.0, f64::INFINITY, 2.0]);
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_equal_width_edges() {
        let edges = equal_width_edges(0.0, 100.0, 10);
        assert_eq!(edges.len(), 11);
        assert!((edges[1] - 10.0).abs() < 1e-9);
        assert_eq!(edges[10], 100.0);
    }

    #[test]
    fn test_equal_width_edges_degenerate_range() {
        let edges = equal_width_edges(50.0, 50.0, 10);
        assert_eq!(edges.len(), 11);
        assert!((edges[0] - 49.5).abs() < 1e-9);
        assert!((edges[10] - 50.5).abs() < 1e-9);
    }

    #[test]
    fn test_bin_index() {
        let edges = equal_width_edges(0.0, 100.0, 10);
        assert_eq!(bin_index(&edges, 0.0), Some(0));
        assert_eq!(bin_index(&edges, 9.99), Some(0));
        assert_eq!(bin_index(&edges, 10.0), Some(1));
        assert_eq!(bin_index(&edges, 99.0), Some(9));
        assert_eq!(bin_index(&edges, 100.0), Some(9));
        assert_eq!(bin_index(&edges, 100.1), None);
        assert_eq!(bin_index(&edges, -0.1), None);
    }

    #[test]
    fn test_bin_index_no_bins() {
        assert_eq!(bin_index(&[1.0], 1.0), None);
        assert_eq!(bin_index(&[], 1.0), None);
    }
}
