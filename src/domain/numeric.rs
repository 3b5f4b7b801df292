//! # Numeric Range Domain
//!
//! Sorted distinct values of one numeric QID column, with a value → position
//! index and the total value range used to normalize widths.

/**
 * File: /src/domain/numeric.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Numeric domain with frequency statistics
 * 2026-10-18		Zihan	JSON persistence for precomputed statistics
 * 2026-10-18		Zihan	Stable order for numerically equal raw values
 */

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Numeric value space of one attribute
#[derive(Debug, Clone)]
pub struct NumericRange {
    /// Distinct raw values, ascending by numeric value
    sorted_values: Vec<String>,
    /// Parsed form of `sorted_values`, same order
    numbers: Vec<f64>,
    /// Raw value -> position in `sorted_values`
    index: HashMap<String, usize>,
    /// Occurrences of each raw value in the scanned column
    frequencies: HashMap<String, usize>,
    /// numeric(max) - numeric(min)
    range: f64,
}

/// Precomputed column statistics, the persisted form of a [`NumericRange`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub frequencies: HashMap<String, usize>,
    pub sorted_values: Vec<String>,
}

impl NumericRange {
    /// Scan a column of raw values and build its domain
    pub fn from_column<I, S>(values: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frequencies: HashMap<String, usize> = HashMap::new();
        for value in values {
            *frequencies.entry(value.as_ref().to_string()).or_insert(0) += 1;
        }
        Self::from_frequencies(frequencies)
    }

    /// Build from per-value frequency counts
    pub fn from_frequencies(frequencies: HashMap<String, usize>) -> Result<Self, DomainError> {
        if frequencies.is_empty() {
            return Err(DomainError::EmptyDomain);
        }

        let mut parsed = frequencies
            .keys()
            .map(|value| parse_numeric(value).map(|number| (number, value.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        // equal numbers ("1", "1.0") order by their raw text
        parsed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let (numbers, sorted_values): (Vec<f64>, Vec<String>) = parsed.into_iter().unzip();
        let index = sorted_values
            .iter()
            .enumerate()
            .map(|(position, value)| (value.clone(), position))
            .collect();
        let range = numbers[numbers.len() - 1] - numbers[0];

        Ok(Self {
            sorted_values,
            numbers,
            index,
            frequencies,
            range,
        })
    }

    /// Rebuild from persisted statistics
    pub fn from_stats(stats: NumericStats) -> Result<Self, DomainError> {
        let domain = Self::from_frequencies(stats.frequencies)?;
        if domain.sorted_values != stats.sorted_values {
            return Err(DomainError::Other(
                "persisted sort order disagrees with the frequency table".to_string(),
            ));
        }
        Ok(domain)
    }

    pub fn stats(&self) -> NumericStats {
        NumericStats {
            frequencies: self.frequencies.clone(),
            sorted_values: self.sorted_values.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.sorted_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_values.is_empty()
    }

    /// Position of a raw value in the global sort order
    pub fn position(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn value_at(&self, position: usize) -> &str {
        &self.sorted_values[position]
    }

    pub fn frequency(&self, value: &str) -> usize {
        self.frequencies.get(value).copied().unwrap_or(0)
    }

    pub fn total_range(&self) -> f64 {
        self.range
    }

    /// Index span covering the whole domain
    pub fn full_span(&self) -> (usize, usize) {
        (0, self.sorted_values.len() - 1)
    }

    /// numeric(values[high]) - numeric(values[low])
    pub fn width(&self, low: usize, high: usize) -> f64 {
        self.numbers[high] - self.numbers[low]
    }

    /// Generalization label for an index span: "v" or "lo,hi"
    pub fn label(&self, low: usize, high: usize) -> String {
        if low == high {
            self.sorted_values[low].clone()
        } else {
            format!("{},{}", self.sorted_values[low], self.sorted_values[high])
        }
    }
}

impl NumericStats {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DomainError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn parse_numeric(value: &str) -> Result<f64, DomainError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| DomainError::NotNumeric(value.to_string()))
}
