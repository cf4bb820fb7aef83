//! Side-by-side demo of the bounded overflow policies.
//!
//! Runs the same fast-producer / slow-consumer workload through a
//! YCBlockingQueue (producers are rate-limited) and a YCDroppingQueue
//! (producers never stall, stale data is shed), then prints what each
//! policy cost: wall-clock time for the blocking run, dropped messages
//! for the dropping run.

use clap::Parser;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use yep_drainq::{YCBlockingQueue, YCDroppingQueue};

/// Side-by-side demo of the blocking and dropping overflow policies
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Queue capacity for both bounded variants
    #[arg(short = 'd', long, default_value = "32")]
    max_size: usize,

    /// Total number of messages each producer sends
    #[arg(short = 'n', long, default_value = "2000")]
    msg_count: u64,

    /// Delay between consumer drains in microseconds (the slow consumer)
    #[arg(short = 'w', long, default_value = "500")]
    consumer_delay_us: u64,
}

fn run_blocking(args: &Args) -> (Duration, u64) {
    let queue = YCBlockingQueue::<Vec<u64>>::new(args.max_size);
    let start = Instant::now();
    let mut received = 0u64;

    thread::scope(|s| {
        let queue = &queue;
        let msg_count = args.msg_count;
        s.spawn(move || {
            for id in 0..msg_count {
                queue.push(id);
            }
        });

        let mut storage = Vec::with_capacity(args.max_size);
        while received < args.msg_count {
            thread::sleep(Duration::from_micros(args.consumer_delay_us));
            storage = queue.pop_all_timeout(Duration::from_millis(20), storage);
            received += storage.len() as u64;
        }
    });

    (start.elapsed(), received)
}

fn run_dropping(args: &Args) -> (Duration, u64, u64) {
    let queue = YCDroppingQueue::<Vec<u64>>::new(args.max_size);
    let dropped_total = AtomicU64::new(0);
    let done = AtomicU64::new(0);
    let start = Instant::now();
    let mut received = 0u64;

    thread::scope(|s| {
        let queue = &queue;
        let dropped_total = &dropped_total;
        let done = &done;
        let msg_count = args.msg_count;
        s.spawn(move || {
            for id in 0..msg_count {
                let dropped = queue.push(id);
                dropped_total.fetch_add(dropped as u64, Ordering::AcqRel);
            }
            done.store(1, Ordering::Release);
        });

        let mut storage = Vec::with_capacity(args.max_size);
        loop {
            thread::sleep(Duration::from_micros(args.consumer_delay_us));
            storage = queue.try_pop_all(storage);
            received += storage.len() as u64;

            if storage.is_empty() && done.load(Ordering::Acquire) == 1 && queue.is_empty() {
                break;
            }
        }
    });

    (start.elapsed(), received, dropped_total.load(Ordering::Acquire))
}

fn main() {
    let args = Args::parse();

    println!("Comparing overflow policies with:");
    println!("  Queue capacity: {}", args.max_size);
    println!("  Messages: {}", args.msg_count);
    println!("  Consumer delay: {} us per drain", args.consumer_delay_us);
    println!();

    if args.max_size == 0 {
        panic!("max_size must be greater than zero");
    }

    let (blocking_elapsed, blocking_received) = run_blocking(&args);
    println!(
        "blocking: received {}/{} messages in {} us (producer was backpressured)",
        blocking_received,
        args.msg_count,
        blocking_elapsed.as_micros()
    );

    let (dropping_elapsed, dropping_received, dropped) = run_dropping(&args);
    println!(
        "dropping: received {}/{} messages in {} us ({} shed on overflow)",
        dropping_received,
        args.msg_count,
        dropping_elapsed.as_micros(),
        dropped
    );

    assert_eq!(
        dropping_received + dropped,
        args.msg_count,
        "every message must be either received or reported dropped"
    );
}
