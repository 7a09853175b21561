//! Per-channel intensity statistics and the default contrast window.

use crate::foundation::error::{LumiplaneError, LumiplaneResult};

/// Number of histogram bins built by [`ChannelHistogram::from_samples`] when
/// the caller has no preference.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Fraction of the inner-bin population kept inside the default window.
const WINDOW_FRACTION: f64 = 0.99;

/// Equal-width intensity histogram over a channel's global range.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelHistogram {
    start: f64,
    end: f64,
    bins: Vec<u64>,
}

impl ChannelHistogram {
    /// Build a histogram of `bin_count` equal-width bins over `[start, end]`.
    ///
    /// Samples outside the range are counted in the nearest edge bin.
    pub fn from_samples(
        samples: &[f64],
        start: f64,
        end: f64,
        bin_count: usize,
    ) -> LumiplaneResult<Self> {
        if bin_count < 3 {
            return Err(LumiplaneError::configuration(
                "histogram needs at least 3 bins",
            ));
        }
        if !(start < end) {
            return Err(LumiplaneError::configuration(
                "histogram range start must be < end",
            ));
        }

        let mut bins = vec![0u64; bin_count];
        let width = (end - start) / bin_count as f64;
        for &s in samples {
            let idx = ((s - start) / width).floor();
            let idx = idx.clamp(0.0, (bin_count - 1) as f64) as usize;
            bins[idx] += 1;
        }
        Ok(Self { start, end, bins })
    }

    /// Construct from precomputed bin populations.
    pub fn from_bins(start: f64, end: f64, bins: Vec<u64>) -> LumiplaneResult<Self> {
        if bins.len() < 3 {
            return Err(LumiplaneError::configuration(
                "histogram needs at least 3 bins",
            ));
        }
        if !(start < end) {
            return Err(LumiplaneError::configuration(
                "histogram range start must be < end",
            ));
        }
        Ok(Self { start, end, bins })
    }

    /// Bin populations.
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Width of one bin.
    pub fn bin_width(&self) -> f64 {
        (self.end - self.start) / self.bins.len() as f64
    }
}

/// Compute the default contrast window for a channel.
///
/// The histogram edge bins usually hold background and saturation spikes. The
/// dominating edge decides which side gets trimmed: when the first bin's
/// population is greater than *or equal to* the last bin's, the walk runs from
/// the low end and pulls the high bound in (ties trim the high end); otherwise
/// the mirrored walk raises the low bound. The retained bound sits at the
/// boundary of the bin where the accumulated inner population first exceeds
/// 0.99 of the inner total, nudged outward by a quarter bin.
pub fn default_window(histogram: &ChannelHistogram) -> (f64, f64) {
    let bins = histogram.bins();
    let n = bins.len();
    let width = histogram.bin_width();
    let eps = width / 4.0;

    let inner_total: u64 = bins[1..n - 1].iter().sum();
    let threshold = WINDOW_FRACTION * inner_total as f64;

    if bins[0] >= bins[n - 1] {
        let mut acc = 0.0;
        for (i, &b) in bins.iter().enumerate().take(n - 1).skip(1) {
            acc += b as f64;
            if acc > threshold {
                let end = histogram.start + (i + 1) as f64 * width + eps;
                return (histogram.start, end);
            }
        }
        (histogram.start, histogram.end)
    } else {
        let mut acc = 0.0;
        for i in (1..n - 1).rev() {
            acc += bins[i] as f64;
            if acc > threshold {
                let start = histogram.start + i as f64 * width - eps;
                return (start, histogram.end);
            }
        }
        (histogram.start, histogram.end)
    }
}

/// Global statistics of one channel, as supplied by the metadata source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelStats {
    /// Smallest sample value observed across the whole channel.
    pub global_min: f64,
    /// Largest sample value observed across the whole channel.
    pub global_max: f64,
    /// Optional intensity histogram over `[global_min, global_max]`.
    pub histogram: Option<ChannelHistogram>,
}

impl ChannelStats {
    /// Best-guess contrast window: the histogram walk when a histogram is
    /// available, the full global range otherwise.
    pub fn default_window(&self) -> (f64, f64) {
        match &self.histogram {
            Some(h) => default_window(h),
            None => (self.global_min, self.global_max),
        }
    }
}
