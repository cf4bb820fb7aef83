//! A multi-producer, multi-consumer send-recv example using YCBlockingQueue
//!
//! Producers push sequential ids into a bounded queue while consumers drain
//! it in bulk; the run ends by verifying that every id arrived exactly once.

use clap::Parser;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use test_support::utils::verify_exact_ids;
use yep_drainq::YCBlockingQueue;

/// A multi-producer, multi-consumer send-recv example using YCBlockingQueue
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Queue capacity (max buffered messages before producers block)
    #[arg(short = 'd', long, default_value = "64")]
    max_size: usize,

    /// Total number of messages to send
    #[arg(short = 'n', long, default_value = "100000")]
    msg_count: u64,

    /// Number of producer threads
    #[arg(short = 'p', long, default_value = "2")]
    producer_threads: u64,

    /// Number of consumer threads
    #[arg(short = 'c', long, default_value = "2")]
    consumer_threads: u64,

    /// Timeout in seconds for producer/consumer loops
    #[arg(short = 't', long, default_value = "10")]
    timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    println!("Starting mpmc-send-recv with:");
    println!("  Queue capacity: {}", args.max_size);
    println!("  Total messages: {}", args.msg_count);
    println!("  Producer threads: {}", args.producer_threads);
    println!("  Consumer threads: {}", args.consumer_threads);

    if args.max_size == 0 {
        panic!("max_size must be greater than zero");
    }

    if args.producer_threads == 0 {
        panic!("At least one producer thread is required");
    }

    if args.consumer_threads == 0 {
        panic!("At least one consumer thread is required");
    }

    let queue = YCBlockingQueue::<Vec<u64>>::new(args.max_size);
    let received_ids = Arc::new(Mutex::new(HashSet::<u64>::new()));

    let base_messages_per_thread = args.msg_count / args.producer_threads;
    let extra_messages = args.msg_count % args.producer_threads;

    let deadline = Instant::now() + Duration::from_secs(args.timeout_secs);
    let start = Instant::now();

    thread::scope(|s| {
        let mut next_index = 0u64;

        for thread_idx in 0..args.producer_threads {
            let extra = if thread_idx < extra_messages { 1 } else { 0 };
            let range_start = next_index;
            let range_end = range_start + base_messages_per_thread + extra;
            next_index = range_end;

            let builder = thread::Builder::new().name(format!("producer_{}", thread_idx));
            let queue = &queue;
            let verbose = args.verbose;
            builder
                .spawn_scoped(s, move || {
                    for id in range_start..range_end {
                        queue.push(id);
                        if verbose {
                            println!("Producer {thread_idx} sent message {id}");
                        }
                    }
                })
                .unwrap();
        }

        for thread_idx in 0..args.consumer_threads {
            let builder = thread::Builder::new().name(format!("consumer_{}", thread_idx));
            let queue = &queue;
            let received_ids = Arc::clone(&received_ids);
            let msg_count = args.msg_count;
            let verbose = args.verbose;
            let timeout_secs = args.timeout_secs;
            builder
                .spawn_scoped(s, move || {
                    let mut storage = Vec::with_capacity(1024);
                    let mut local_received = 0u64;

                    loop {
                        if received_ids.lock().unwrap().len() as u64 >= msg_count {
                            break;
                        }
                        if Instant::now() > deadline {
                            panic!("Consumer {thread_idx} timed out after {timeout_secs}s");
                        }

                        storage = queue.pop_all_timeout(Duration::from_millis(20), storage);
                        if storage.is_empty() {
                            continue;
                        }

                        local_received += storage.len() as u64;
                        let mut ids = received_ids.lock().unwrap();
                        for &id in &storage {
                            if !ids.insert(id) {
                                panic!("duplicate message received: {id}");
                            }
                        }
                    }

                    if verbose {
                        println!(
                            "Consumer {thread_idx} finished after receiving {local_received} messages"
                        );
                    }
                })
                .unwrap();
        }
    });

    let elapsed = start.elapsed();

    verify_exact_ids(&received_ids.lock().unwrap(), args.msg_count);

    println!(
        "mpmc-send-recv finished: {} messages in {} us",
        args.msg_count,
        elapsed.as_micros()
    );
}
