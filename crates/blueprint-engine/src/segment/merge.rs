//! Small-region cleanup.

use std::collections::{BTreeMap, BTreeSet};

use super::region::segment;
use super::{LabelMap, Region};

/// Fold every region smaller than `min_area` into its dominant neighbor.
///
/// The dominant neighbor is the label held by the most distinct pixels
/// 4-adjacent to the region, lowest label on ties. A pixel that touches the
/// region along several edges still casts a single vote. `map` is relabeled in
/// place. A region that absorbed a neighbor during a pass is skipped until
/// the next pass, since its recorded area is stale. Passes repeat until one
/// merges nothing; the returned regions describe the final map.
///
/// A region with no neighbors (a single-color image) is left alone.
pub fn merge_small_regions(map: &mut LabelMap, regions: Vec<Region>, min_area: usize) -> Vec<Region> {
    let mut regions = regions;
    let mut passes = 0;
    loop {
        let merged = merge_pass(map, &regions, min_area);
        if merged == 0 {
            break;
        }
        passes += 1;
        tracing::debug!(pass = passes, merged, "merged small regions");
        regions = segment(map);
    }

    debug_assert_eq!(
        regions.iter().map(|r| r.area_px).sum::<usize>(),
        map.len()
    );
    regions
}

fn merge_pass(map: &mut LabelMap, regions: &[Region], min_area: usize) -> usize {
    let mut owner = vec![0usize; map.len()];
    for (id, region) in regions.iter().enumerate() {
        for &p in &region.pixels {
            owner[p] = id;
        }
    }

    let mut deferred = vec![false; regions.len()];
    let mut merged = 0;

    for (id, region) in regions.iter().enumerate() {
        if deferred[id] || region.area_px >= min_area {
            continue;
        }
        let Some(target) = dominant_neighbor(map, &owner, id, region) else {
            continue;
        };

        for &p in &region.pixels {
            map.set(p, target);
        }
        for &p in &region.pixels {
            for n in map.neighbors4(p) {
                if owner[n] != id && map.as_slice()[n] == target {
                    deferred[owner[n]] = true;
                }
            }
        }
        merged += 1;
    }
    merged
}

fn dominant_neighbor(map: &LabelMap, owner: &[usize], id: usize, region: &Region) -> Option<usize> {
    let labels = map.as_slice();
    let own = labels[region.pixels[0]];
    let border: BTreeSet<usize> = region
        .pixels
        .iter()
        .flat_map(|&p| map.neighbors4(p))
        .filter(|&n| owner[n] != id && labels[n] != own)
        .collect();
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for n in border {
        *counts.entry(labels[n]).or_default() += 1;
    }

    // ascending label order, so a strict comparison keeps the lowest on ties
    let mut best: Option<(usize, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}
