use std::fmt::Write;
use std::time::Instant;

use chain_hashmap::{HashMap, MapConfig, Result};
use clap::Parser;
use hdrhistogram::Histogram;
use rand::seq::SliceRandom;
use tracing::info;

#[derive(Parser, Clone)]
struct BenchmarkConfig {
    #[arg(short, long, default_value_t = 100000)]
    pub count: u32,
    #[arg(short, long, default_value_t = 3)]
    pub data_size: u32,
    #[arg(long)]
    pub config: Option<String>,
    #[arg(short, long, num_args = 1..)]
    pub tests: Vec<String>,
}

fn gen_benchmark_data(count: u32) -> String {
    let mut state: u32 = 1234;
    let mut data = String::with_capacity(count as usize);

    for _ in 0..count {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        let ch = b'0' + ((state >> 16) & 63) as u8;
        data.push(ch as char);
    }
    data
}

fn test_is_selected(tests: &[String], name: &str) -> bool {
    tests.is_empty() || tests.iter().any(|t| t == name)
}

fn num_to_str(value: i64) -> String {
    let mut s = String::with_capacity(32);
    let _ = write!(&mut s, "key{}", value);
    s
}

fn report(name: &str, hist: &Histogram<u64>, total_ns: u128, count: u32) {
    println!("======{}======", name.to_uppercase());
    println!(" {} operations completed in {:.3} ms", count, total_ns as f64 / 1_000_000f64);
    println!(
        "     Throughput summary: {:.2} operations per second",
        count as f64 / (total_ns as f64 / 1_000_000_000f64)
    );
    println!("     Latency summary (ns): ");
    println!("               {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}", "avg", "min", "p50", "p95", "p99", "max");
    println!(
        "               {:>8.1} {:>8} {:>8} {:>8} {:>8} {:>8}",
        hist.mean(),
        hist.min(),
        hist.value_at_quantile(0.5),
        hist.value_at_quantile(0.95),
        hist.value_at_quantile(0.99),
        hist.max()
    );
}

/// Times `op` once per key and prints the latency distribution.
fn benchmark<F>(name: &str, keys: &[String], mut op: F) -> Result<()>
where
    F: FnMut(&String),
{
    let mut hist = Histogram::<u64>::new_with_bounds(1, 60_000_000_000, 3)?;
    let st = Instant::now();
    for key in keys {
        let start = Instant::now();
        op(key);
        hist.saturating_record(start.elapsed().as_nanos() as u64);
    }
    report(name, &hist, st.elapsed().as_nanos(), keys.len() as u32);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::try_init()?;
    let config = BenchmarkConfig::parse();
    let map_config = MapConfig::load(config.config.as_deref());
    let mut map: HashMap<String, String> = HashMap::with_config(map_config)?;
    let data = gen_benchmark_data(config.data_size);

    let mut keys: Vec<String> = (0..config.count as i64).map(num_to_str).collect();
    let tests = &config.tests;

    if test_is_selected(tests, "insert") {
        benchmark("insert", &keys, |key| {
            map.insert(key.clone(), data.clone());
        })?;
    }

    keys.shuffle(&mut rand::rng());
    if test_is_selected(tests, "get") {
        benchmark("get", &keys, |key| {
            std::hint::black_box(map.get(key));
        })?;
    }
    if test_is_selected(tests, "upsert") {
        benchmark("upsert", &keys, |key| {
            map.get_or_insert_default(key.clone()).push('+');
        })?;
    }
    if test_is_selected(tests, "iter") {
        let st = Instant::now();
        let total = map.iter().count();
        info!("iterated {} pairs in {:?}", total, st.elapsed());
    }
    info!("{}", map.stats());
    if test_is_selected(tests, "erase") {
        benchmark("erase", &keys, |key| {
            map.erase(key);
        })?;
    }
    info!("final size {}, capacity {}", map.len(), map.capacity());

    Ok(())
}
