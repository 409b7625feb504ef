/// Populate Throughput Benchmarks
///
/// Measures a full reset + populate pass over synthetic header trees of
/// increasing size, and the cost of the dry-run planner on the same trees.
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lninclude::{Aggregator, AggregatorConfig, TargetMode};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Build `dirs` include directories with `per_dir` headers each, plus an
/// equally sized non-whitelisted sibling tree.
fn build_tree(root: &Path, dirs: usize, per_dir: usize) {
    for d in 0..dirs {
        for (branch, prefix) in [("inc", "h"), ("other", "o")] {
            let dir = root.join("src").join(branch).join(format!("mod{}", d));
            fs::create_dir_all(&dir).unwrap();
            for f in 0..per_dir {
                // Every tenth header collides with one in mod0
                let name = if f % 10 == 0 {
                    format!("{}_{}.H", prefix, f)
                } else {
                    format!("{}_{}_{}.H", prefix, d, f)
                };
                fs::write(dir.join(name), "").unwrap();
            }
        }
    }
}

fn bench_populate(c: &mut Criterion) {
    let mut group = c.benchmark_group("populate");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for &(dirs, per_dir) in &[(4usize, 25usize), (16, 50), (32, 100)] {
        let tmp = TempDir::new().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        build_tree(&root, dirs, per_dir);

        let config = AggregatorConfig::new(root.join("src"), root.join("lnInclude"), ["inc"])
            .validate_in(&root)
            .unwrap();
        let files = (dirs * per_dir) as u64;
        group.throughput(Throughput::Elements(files));

        let aggregator = Aggregator::new(config.clone());
        group.bench_with_input(BenchmarkId::new("reset_run", files), &files, |b, _| {
            b.iter(|| aggregator.run(TargetMode::Reset, |_| {}).unwrap())
        });

        let planner = Aggregator::new(config).with_dry_run(true);
        group.bench_with_input(BenchmarkId::new("dry_run", files), &files, |b, _| {
            b.iter(|| planner.run(TargetMode::Reset, |_| {}).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_populate);
criterion_main!(benches);
