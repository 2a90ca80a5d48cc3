// Run with: cargo run --example debug_scan -- /path/to/scan

use devsweep_core::{
    CancellationToken, ScanConfig, ScanEvent, ScanStream, ScannerKind, format_count, format_size,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("Scanning: {:?}", path);

    let mut stream = ScanStream::spawn(
        ScannerKind::Unified.build(),
        path,
        CancellationToken::new(),
        &ScanConfig::default(),
    );

    let start = Instant::now();
    let mut last_print = Instant::now();
    let mut last_dirs = 0u64;
    let mut stuck_count = 0;

    loop {
        let Some(event) = stream.try_next() else {
            let p = stream.progress();
            if p.dirs_scanned == last_dirs {
                stuck_count += 1;
            } else {
                stuck_count = 0;
            }
            last_dirs = p.dirs_scanned;

            if last_print.elapsed() > Duration::from_secs(1) || stuck_count > 50 {
                println!(
                    "[{:>6.1}s] dirs={:<8} found={:<5} bytes={:<12} errors={:<4} stuck={} path={:?}",
                    start.elapsed().as_secs_f64(),
                    p.dirs_scanned,
                    p.items_found,
                    p.bytes_found,
                    p.errors,
                    stuck_count,
                    p.current_path
                        .as_ref()
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_default()
                );
                last_print = Instant::now();
            }
            std::thread::sleep(Duration::from_millis(20));
            continue;
        };

        match event {
            ScanEvent::Discovery(item) => {
                println!(
                    "  {} {:<12} {:>10}  {}",
                    item.kind.icon(),
                    item.kind.label(),
                    format_size(item.size),
                    item.path.display()
                );
            }
            ScanEvent::Finished(done) => {
                println!(
                    "Done in {:.2}s: {} items, {} in {} dirs ({:?})",
                    start.elapsed().as_secs_f64(),
                    format_count(done.items_found),
                    format_size(done.total_size),
                    format_count(done.directories_scanned),
                    done.result
                );
                break;
            }
        }
    }
}
