/**
 * File: /src/mondrian/selector.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Widest normalized attribute selection
 */

use crate::mondrian::types::{AnonymizeError, Result, RunContext};
use crate::partition::Partition;

/// Normalized width of one attribute at the partition's current state
pub fn normalized_width(ctx: &RunContext, partition: &Partition, attribute: usize) -> Result<f64> {
    let width = ctx.domains[attribute].normalized_width(partition.attribute(attribute).width)?;
    if width > 1.0 {
        return Err(AnonymizeError::ModelInconsistency {
            attribute,
            partition_size: partition.size(),
            detail: format!(
                "normalized width {} of state {:?} exceeds 1",
                width,
                partition.attribute(attribute).width
            ),
        });
    }
    Ok(width)
}

/// Choose the splittable QID with the largest normalized width.
/// Ties go to the attribute declared first.
pub fn choose_dimension(ctx: &RunContext, partition: &Partition) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for attribute in 0..ctx.qid_count {
        if !partition.is_splittable(attribute) {
            continue;
        }
        let width = normalized_width(ctx, partition, attribute)?;
        if best.map_or(true, |(_, max)| width > max) {
            best = Some((attribute, width));
        }
    }

    best.map(|(attribute, _)| attribute)
        .ok_or_else(|| AnonymizeError::UnreachableState {
            partition_size: partition.size(),
            detail: "dimension selection with no splittable attribute".to_string(),
        })
}
