//! # Example: one_shot
//!
//! A single delayed firing, observed through a raw event receiver.
//!
//! ## Flow
//! ```text
//! Task::new() ──► run()
//!     ├─► publish(start)
//!     ├─► [500ms countdown]
//!     ├─► callback(&args) ─► publish(result)
//!     └─► publish(end)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example one_shot
//! ```

use std::time::Duration;

use countdown::{EventKind, Task, TaskConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. A callback that greets whatever it is given
    let task = Task::new(
        |who: &String| {
            println!("[callback] hello, {who}");
            Ok::<(), String>(())
        },
        TaskConfig::once(Duration::from_millis(500)),
        "world".to_string(),
    );

    // 2. Subscribe before running so `start` is not missed
    let mut events = task.subscribe();
    task.run()?;

    // 3. Print events until the task ends
    loop {
        let ev = events.recv().await?;
        println!("[event] {} seq={}", ev.kind, ev.seq);
        if ev.kind == EventKind::End {
            break;
        }
    }

    println!("{task}");
    println!("took {:?}", task.duration().unwrap_or_default());
    Ok(())
}
