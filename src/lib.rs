/**
 * File: /src/lib.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Mondrian k-anonymity library
 */
pub mod config;
pub mod dataset;
pub mod domain;
pub mod mondrian;
pub mod partition;

pub use domain::{AttributeDomain, GeneralizationHierarchy, NumericRange};
pub use mondrian::{
    mondrian, AnonymizationResult, AnonymizeError, AnonymizerConfig, MondrianAnonymizer,
    ParallelConfig, Record,
};
pub use partition::Partition;

use chrono::Local;

/// Wall-clock stamp for progress lines
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
