//! Bounded producer/consumer stream connecting a source to a sink.
//!
//! One cycle runs exactly two tasks: the producer on the caller's thread and
//! the consumer on a scoped thread. The producer's error is only returned
//! after the consumer has drained everything that was enqueued.

use std::thread;

use crossbeam_channel::bounded;
use tracing::trace;

use crate::collector::counter::{CounterStats, CounterTuple};
use crate::collector::error::CollectError;

/// Capacity of the tuple queue between producer and consumer.
pub const QUEUE_CAPACITY: usize = 64;

/// Runs one collection cycle.
///
/// `produce` receives the sending half and runs to completion or its first
/// fatal error. The queue is closed when it returns, whatever the outcome.
/// `consume` is called once per tuple, in enqueue order, until the queue is
/// closed and empty.
///
/// A panic in `consume` is re-raised on the calling thread after the
/// producer has stopped.
pub fn run_cycle<P, C>(produce: P, mut consume: C) -> Result<(), CollectError>
where
    P: FnOnce(&CounterStats) -> Result<(), CollectError>,
    C: FnMut(CounterTuple) + Send,
{
    let (tx, rx) = bounded::<CounterTuple>(QUEUE_CAPACITY);

    thread::scope(|s| {
        let consumer = s.spawn(move || {
            let mut count = 0usize;
            for tuple in rx.iter() {
                consume(tuple);
                count += 1;
            }
            count
        });

        let stats = CounterStats::new(tx);
        let result = produce(&stats);
        // Dropping the only sender closes the queue.
        drop(stats);

        match consumer.join() {
            Ok(count) => trace!("counter stream drained: {} tuples", count),
            Err(panic) => std::panic::resume_unwind(panic),
        }

        result
    })
}
