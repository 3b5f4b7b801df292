//! # Mondrian: Multidimensional k-Anonymity
//!
//! Recursive multidimensional partitioning of tabular microdata so that every
//! released row is indistinguishable, on its quasi-identifiers, from at least
//! k-1 others.
//!
//! ## Algorithm Overview
//!
//! 1. **Dimension selection**: the splittable QID with the largest normalized width
//! 2. **Splitting**: median cut (numeric) or hierarchy children (categorical)
//! 3. **Retry**: a failed split disables the attribute on that partition
//! 4. **Aggregation**: rows with shared labels and the NCP loss metric
//!
//! ## References
//! LeFevre, K., DeWitt, D. J., Ramakrishnan, R. (2006). "Mondrian Multidimensional
//! K-Anonymity." International Conference on Data Engineering (ICDE).

/**
 * File: /src/mondrian/mod.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Created Mondrian module
 */

pub mod types;
pub mod selector;
pub mod splitter;
pub mod engine;
pub mod ncp;

pub use types::*;
pub use engine::{anonymize, anonymize_parallel, mondrian, settle, MondrianAnonymizer, Step};
pub use selector::{choose_dimension, normalized_width};
pub use splitter::{split_partition, MedianCut};
