use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/**
 * File: /src/config.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	JSON run configuration for the anonymizer binary
 */
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::dataset::{self, DatasetSchema};
use crate::domain::{AttributeDomain, NumericRange, NumericStats};
use crate::mondrian::{AnonymizerConfig, ParallelConfig, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKindSpec {
    Numeric,
    Categorical,
}

/// One QID column of the raw data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    /// Column in the raw data file
    pub column: usize,
    pub kind: AttributeKindSpec,
    /// `leaf;parent;...;*` file, categorical only
    #[serde(default)]
    pub hierarchy: Option<PathBuf>,
}

/// Contents of the JSON configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub data: PathBuf,
    pub output: PathBuf,
    pub k: usize,
    #[serde(default)]
    pub qid_count: Option<usize>,
    pub sensitive_column: usize,
    pub attributes: Vec<AttributeSpec>,
    /// Where numeric column statistics are cached between runs
    #[serde(default)]
    pub stats_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub parallel: ParallelConfig,
}

pub struct Config {
    run: RunConfig,
    // relative paths in the file resolve against its directory
    base_dir: PathBuf,
}

impl Config {
    /// constructor
    ///
    /// # Examples
    /// ```bash
    /// $ cargo run -- "data/adult.json"
    pub fn new(mut args: impl Iterator<Item = String>) -> Result<Config, Box<dyn Error>> {
        // args:
        // 0: program name
        // 1: config path
        args.next();
        let path = PathBuf::from(args.next().ok_or("usage: fast_mondrian <config.json>")?);
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, Box<dyn Error>> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let run: RunConfig = serde_json::from_reader(reader)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let config = Config { run, base_dir };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.run.attributes.is_empty() {
            return Err("configuration lists no QID attributes".into());
        }
        for attribute in &self.run.attributes {
            if attribute.kind == AttributeKindSpec::Categorical && attribute.hierarchy.is_none() {
                return Err(format!("categorical attribute {} has no hierarchy file", attribute.name).into());
            }
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn get_run(&self) -> &RunConfig {
        &self.run
    }

    pub fn get_k(&self) -> usize {
        self.run.k
    }

    pub fn get_data_path(&self) -> PathBuf {
        self.resolve(&self.run.data)
    }

    pub fn get_output_path(&self) -> PathBuf {
        self.resolve(&self.run.output)
    }

    pub fn get_log_level(&self) -> Result<LevelFilter, Box<dyn Error>> {
        match &self.run.log_level {
            Some(level) => Ok(level
                .parse::<LevelFilter>()
                .map_err(|e| format!("invalid log level {:?}: {}", level, e))?),
            None => Ok(LevelFilter::Info),
        }
    }

    pub fn schema(&self) -> DatasetSchema {
        DatasetSchema::new(
            self.run.attributes.iter().map(|a| a.column).collect(),
            self.run.sensitive_column,
        )
    }

    pub fn anonymizer_config(&self) -> AnonymizerConfig {
        AnonymizerConfig {
            k: self.run.k,
            qid_count: self.run.qid_count,
            parallel: self.run.parallel.clone(),
        }
    }

    /// Build one domain per attribute, reusing cached numeric statistics
    pub fn build_domains(&self, records: &[Record]) -> Result<Vec<AttributeDomain>, Box<dyn Error>> {
        let mut domains = Vec::with_capacity(self.run.attributes.len());
        for (index, attribute) in self.run.attributes.iter().enumerate() {
            let domain: AttributeDomain = match (attribute.kind, &attribute.hierarchy) {
                (AttributeKindSpec::Categorical, Some(hierarchy)) => {
                    dataset::read_hierarchy_file(self.resolve(hierarchy))?.into()
                }
                (AttributeKindSpec::Categorical, None) => {
                    return Err(format!("categorical attribute {} has no hierarchy file", attribute.name).into())
                }
                (AttributeKindSpec::Numeric, _) => self.numeric_domain(records, index, &attribute.name)?.into(),
            };
            domains.push(domain);
        }
        Ok(domains)
    }

    fn numeric_domain(
        &self,
        records: &[Record],
        index: usize,
        name: &str,
    ) -> Result<NumericRange, Box<dyn Error>> {
        let Some(dir) = &self.run.stats_dir else {
            return Ok(dataset::numeric_domain(records, index)?);
        };
        let path = self.resolve(dir).join(format!("{}_static.json", name));
        if path.exists() {
            info!("Loading numeric statistics for {} from {}", name, path.display());
            return Ok(NumericRange::from_stats(NumericStats::load(&path)?)?);
        }
        let domain = dataset::numeric_domain(records, index)?;
        domain.stats().save(&path)?;
        info!("Saved numeric statistics for {} to {}", name, path.display());
        Ok(domain)
    }
}
