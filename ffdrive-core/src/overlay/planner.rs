// ============================================================================
// ffdrive-core/src/overlay/planner.rs
// ============================================================================
//
// OVERLAY BATCH PLANNER: Splits large overlay sets into chained ffmpeg passes
//
// ffmpeg has a practical ceiling on command length. When the filter graph for
// every overlay would exceed the configured character budget, the overlays are
// split into `p = ceil(len / budget)` consecutive batches. Batch `i` reads the
// output of batch `i - 1`, so batches always run one after another.
//
// Partitioning: with `n` visible overlays, each batch gets `n / p` overlays and
// the remainder goes one each to the leading batches. `p` is clamped to `n`, so
// no batch is ever empty.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::command::ComplexFilter;
use crate::error::{CoreError, CoreResult};

use super::graph;
use super::spec::OverlaySpec;

/// One ffmpeg pass over a run of overlays.
#[derive(Debug, Clone)]
pub struct OverlayBatch {
    pub overlays: Vec<OverlaySpec>,
    /// The original source for the first batch, else the previous batch's output.
    pub input: PathBuf,
    pub output: PathBuf,
    pub filter: ComplexFilter,
}

impl OverlayBatch {
    /// A batch with nothing to draw: the input is simply copied to the output.
    #[must_use]
    pub fn is_copy(&self) -> bool {
        self.overlays.is_empty()
    }
}

/// Plans overlay passes against a filter-graph character budget.
#[derive(Debug, Clone)]
pub struct OverlayBatchPlanner {
    max_graph_chars: usize,
}

impl OverlayBatchPlanner {
    pub fn new(max_graph_chars: usize) -> CoreResult<Self> {
        if max_graph_chars == 0 {
            return Err(CoreError::InvalidInput(
                "filter graph budget must be greater than zero".to_string(),
            ));
        }
        Ok(Self { max_graph_chars })
    }

    #[must_use]
    pub fn max_graph_chars(&self) -> usize {
        self.max_graph_chars
    }

    /// Partitions `overlays` into sequential batches.
    ///
    /// Intermediate outputs are named `overlay_pass_<i>.<extension>` inside
    /// `work_dir`; the caller moves the last batch's output into place.
    pub fn plan(
        &self,
        overlays: &[OverlaySpec],
        source: &Path,
        work_dir: &Path,
        extension: &str,
    ) -> CoreResult<Vec<OverlayBatch>> {
        let visible: Vec<OverlaySpec> = overlays
            .iter()
            .filter(|o| o.is_visible())
            .cloned()
            .collect();
        let skipped = overlays.len() - visible.len();
        if skipped > 0 {
            debug!("Skipping {skipped} zero-area overlay(s)");
        }

        let output_for = |index: usize| work_dir.join(format!("overlay_pass_{index}.{extension}"));

        if visible.is_empty() {
            debug!("No visible overlays; planning a single copy pass");
            return Ok(vec![OverlayBatch {
                overlays: Vec::new(),
                input: source.to_path_buf(),
                output: output_for(0),
                filter: ComplexFilter::default(),
            }]);
        }

        let full = graph::render(&visible)?;
        let total_len = full.len();
        if total_len <= self.max_graph_chars {
            debug!(
                "Filter graph for {} overlay(s) fits the budget ({total_len} <= {})",
                visible.len(),
                self.max_graph_chars
            );
            return Ok(vec![OverlayBatch {
                overlays: visible,
                input: source.to_path_buf(),
                output: output_for(0),
                filter: full,
            }]);
        }

        let count = visible.len();
        let passes = total_len.div_ceil(self.max_graph_chars).min(count);
        let per_batch = count / passes;
        let remainder = count % passes;
        debug!(
            "Filter graph is {total_len} chars against a budget of {}; splitting {count} overlay(s) into {passes} passes",
            self.max_graph_chars
        );

        let mut batches: Vec<OverlayBatch> = Vec::with_capacity(passes);
        let mut remaining = visible.into_iter();
        for index in 0..passes {
            let take = per_batch + usize::from(index < remainder);
            let chunk: Vec<OverlaySpec> = remaining.by_ref().take(take).collect();
            let filter = graph::render(&chunk)?;
            if filter.len() > self.max_graph_chars {
                warn!(
                    "Overlay pass {} of {passes} still exceeds the filter graph budget ({} > {})",
                    index + 1,
                    filter.len(),
                    self.max_graph_chars
                );
            }
            let input = batches
                .last()
                .map_or_else(|| source.to_path_buf(), |previous| previous.output.clone());
            batches.push(OverlayBatch {
                overlays: chunk,
                input,
                output: output_for(index),
                filter,
            });
        }

        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FrameSize, PixelOffset};
    use crate::overlay::{Anchor, OverlayKind};
    use proptest::prelude::*;
    use std::time::Duration;
    use uuid::Uuid;

    fn rasterized(index: usize, visible: bool) -> OverlaySpec {
        let size = if visible { FrameSize::new(32, 32) } else { FrameSize::default() };
        let mut spec = OverlaySpec::new(
            Duration::from_millis(index as u64 * 100),
            Duration::from_millis(index as u64 * 100 + 50),
            size,
            Anchor::TopLeft,
            PixelOffset::new(index as i32, 0),
            OverlayKind::Rectangle,
        )
        .unwrap();
        spec.asset = Some(PathBuf::from(format!("/tmp/ov{index}.png")));
        spec
    }

    fn rasterized_list(count: usize) -> Vec<OverlaySpec> {
        (0..count).map(|i| rasterized(i, true)).collect()
    }

    fn ids(batches: &[OverlayBatch]) -> Vec<Uuid> {
        batches
            .iter()
            .flat_map(|b| b.overlays.iter().map(|o| o.id))
            .collect()
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert!(OverlayBatchPlanner::new(0).is_err());
    }

    #[test]
    fn test_empty_list_is_single_copy_batch() {
        let planner = OverlayBatchPlanner::new(100).unwrap();
        let batches = planner
            .plan(&[], Path::new("in.mp4"), Path::new("/work"), "mp4")
            .unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_copy());
        assert_eq!(batches[0].input, PathBuf::from("in.mp4"));
        assert_eq!(batches[0].output, PathBuf::from("/work/overlay_pass_0.mp4"));
    }

    #[test]
    fn test_all_zero_area_is_copy_batch() {
        let planner = OverlayBatchPlanner::new(100).unwrap();
        let overlays = vec![rasterized(0, false), rasterized(1, false)];
        let batches = planner
            .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mp4")
            .unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_copy());
    }

    #[test]
    fn test_fits_budget_is_single_batch() {
        let overlays = rasterized_list(3);
        let full = graph::render(&overlays).unwrap();
        let planner = OverlayBatchPlanner::new(full.len()).unwrap();
        let batches = planner
            .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mp4")
            .unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].filter, full);
        assert_eq!(ids(&batches), overlays.iter().map(|o| o.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_one_char_over_budget_splits() {
        let overlays = rasterized_list(4);
        let full = graph::render(&overlays).unwrap();
        let planner = OverlayBatchPlanner::new(full.len() - 1).unwrap();
        let batches = planner
            .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mkv")
            .unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].overlays.len(), 2);
        assert_eq!(batches[1].overlays.len(), 2);
        assert_eq!(batches[1].input, batches[0].output);
        assert_eq!(batches[1].output, PathBuf::from("/work/overlay_pass_1.mkv"));
    }

    #[test]
    fn test_remainder_goes_to_leading_batches() {
        let overlays = rasterized_list(7);
        let full = graph::render(&overlays).unwrap();
        // Budget chosen so ceil(len / budget) == 3.
        let budget = full.len().div_ceil(3);
        let planner = OverlayBatchPlanner::new(budget).unwrap();
        let batches = planner
            .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mp4")
            .unwrap();
        let sizes: Vec<usize> = batches.iter().map(|b| b.overlays.len()).collect();
        assert_eq!(sizes, vec![3, 2, 2]);
    }

    #[test]
    fn test_passes_clamped_to_overlay_count() {
        let overlays = rasterized_list(2);
        let planner = OverlayBatchPlanner::new(1).unwrap();
        let batches = planner
            .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mp4")
            .unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.overlays.len() == 1));
    }

    #[test]
    fn test_zero_area_excluded_from_batches() {
        let overlays = vec![rasterized(0, true), rasterized(1, false), rasterized(2, true)];
        let planner = OverlayBatchPlanner::new(10_000).unwrap();
        let batches = planner
            .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mp4")
            .unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].overlays.len(), 2);
        assert!(!batches[0].filter.inputs.contains("ov1.png"));
    }

    proptest! {
        #[test]
        fn prop_batches_partition_in_order(count in 1usize..40, budget in 150usize..4000) {
            let overlays = rasterized_list(count);
            let full_len = graph::render(&overlays).unwrap().len();
            let planner = OverlayBatchPlanner::new(budget).unwrap();
            let batches = planner
                .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mp4")
                .unwrap();

            let expected_passes = if full_len <= budget { 1 } else { full_len.div_ceil(budget) };
            prop_assert_eq!(batches.len(), expected_passes);
            prop_assert_eq!(ids(&batches), overlays.iter().map(|o| o.id).collect::<Vec<_>>());
            prop_assert_eq!(&batches[0].input, &PathBuf::from("in.mp4"));
            for pair in batches.windows(2) {
                prop_assert_eq!(&pair[1].input, &pair[0].output);
            }
        }

        #[test]
        fn prop_threshold_boundary(count in 1usize..20, delta in 0usize..3) {
            let overlays = rasterized_list(count);
            let full_len = graph::render(&overlays).unwrap().len();
            let budget = full_len + delta;
            let planner = OverlayBatchPlanner::new(budget).unwrap();
            let batches = planner
                .plan(&overlays, Path::new("in.mp4"), Path::new("/work"), "mp4")
                .unwrap();
            prop_assert_eq!(batches.len(), 1);
            prop_assert_eq!(batches[0].overlays.len(), count);
        }
    }
}
