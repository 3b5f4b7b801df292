/**
 * File: /src/mondrian/ncp.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	NCP aggregation and output rows
 */

use crate::mondrian::selector::normalized_width;
use crate::mondrian::types::{Record, Result, RunContext};
use crate::partition::Partition;

/// Normalized certainty penalty of a terminal partition set, in percent.
///
/// Each partition contributes the sum of its attributes' normalized widths
/// weighted by its size; the total is divided by `qid_count * records`.
pub fn ncp(ctx: &RunContext, partitions: &[Partition]) -> Result<f64> {
    let record_count = ctx.records.len();
    if record_count == 0 || ctx.qid_count == 0 {
        return Ok(0.0);
    }

    let mut penalty = 0.0;
    for partition in partitions {
        let mut partition_penalty = 0.0;
        for attribute in 0..ctx.qid_count {
            partition_penalty += normalized_width(ctx, partition, attribute)?;
        }
        penalty += partition_penalty * partition.size() as f64;
    }

    Ok(penalty / ctx.qid_count as f64 / record_count as f64 * 100.0)
}

/// One output row per member: shared labels, then the member's sensitive value
pub fn expand_rows(ctx: &RunContext, partitions: &[Partition]) -> Vec<Record> {
    partitions
        .iter()
        .flat_map(|partition| {
            let labels: Vec<String> = partition.labels().map(str::to_string).collect();
            partition.members().iter().map(move |&row| {
                let mut output = labels.clone();
                output.push(ctx.sensitive(row).to_string());
                output
            })
        })
        .collect()
}
