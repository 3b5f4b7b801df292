/*
 * File: /main.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process;
use std::time::Instant;

use fast_mondrian::config::Config;
use fast_mondrian::dataset::{read_records, write_rows};
use fast_mondrian::{timestamp, MondrianAnonymizer};
use log::{error, info, LevelFilter};

fn setup_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    simple_logger::SimpleLogger::new().with_level(level).init()
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let method = "mondrian";

    let load_start = Instant::now();
    let data_path = config.get_data_path();
    info!("[method: {}] [{}] Dataset: {}", method, timestamp(), data_path.display());
    let records = read_records(BufReader::new(File::open(&data_path)?), &config.schema())?;
    let domains = config.build_domains(&records)?;
    info!(
        "[method: {}] [{}] Loaded {} records in {}ms",
        method,
        timestamp(),
        records.len(),
        load_start.elapsed().as_millis()
    );

    let anonymizer = MondrianAnonymizer::new(config.anonymizer_config());
    let result = anonymizer.run(&domains, &records)?;
    info!(
        "[method: {}] [{}] k = {}, {} partitions (sizes {}..={}), NCP: {:.2} %, done in {:.3}s",
        method,
        timestamp(),
        config.get_k(),
        result.stats.partitions,
        result.stats.min_partition_size,
        result.stats.max_partition_size,
        result.metrics.ncp,
        result.metrics.elapsed_secs
    );

    let output_path = config.get_output_path();
    write_rows(BufWriter::new(File::create(&output_path)?), &result.rows)?;
    info!(
        "[method: {}] [{}] Wrote {} rows to {}",
        method,
        timestamp(),
        result.rows.len(),
        output_path.display()
    );
    Ok(())
}

fn main() {
    let config = Config::new(std::env::args()).unwrap_or_else(|e| {
        eprintln!("Problem parsing arguments: {}", e);
        process::exit(1);
    });

    let level = config.get_log_level().unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    setup_logger(level).expect("Failed to initialize logger");

    if let Err(e) = run(&config) {
        error!("Anonymization failed: {}", e);
        process::exit(1);
    }
}
