//! # Example: interval_pause
//!
//! A repeating task that is paused mid-interval, resumed, and finally terminated.
//! Events are traced by the built-in [`LogWriter`] (requires the `logging` feature).
//!
//! ## Flow
//! ```text
//! run() ─► result ─► result ─► pause ─► [1s idle] ─► resume ─► result ─► terminate ─► end
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example interval_pause --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use countdown::{LogWriter, Subscribe, Task, TaskConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ticks = Arc::new(AtomicU32::new(0));
    let task = Task::new(
        |ticks: &Arc<AtomicU32>| {
            let n = ticks.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 2 {
                return Err(format!("tick {n} failed"));
            }
            println!("[callback] tick {n}");
            Ok(())
        },
        TaskConfig::forever(Duration::from_millis(300)),
        Arc::clone(&ticks),
    );

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let logger = task.attach(subs)?;
    task.run()?;

    tokio::time::sleep(Duration::from_millis(750)).await;
    task.pause();
    println!("[main] paused with {:?} left", task.remaining_countdown());

    tokio::time::sleep(Duration::from_secs(1)).await;
    task.resume()?;

    tokio::time::sleep(Duration::from_millis(400)).await;
    task.terminate();
    logger.await?;

    println!("[main] errors: {:?}", task.errors());
    println!("{task}");
    Ok(())
}
