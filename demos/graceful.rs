//! Spawns a few workers under one lifeline, then shuts them down gracefully.
//!
//! Run with: `cargo run --example graceful`

use std::time::Duration;

use lifeline::{Latch, Lifeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let life = Lifeline::new();

    for id in 0..3 {
        life.spawn_fn(move |signal: Latch| async move {
            loop {
                tokio::select! {
                    _ = signal.wait() => break,
                    _ = tokio::time::sleep(Duration::from_millis(100)) => {
                        println!("worker {id}: tick");
                    }
                }
            }
            println!("worker {id}: stopped");
        })?;
    }

    tokio::time::sleep(Duration::from_millis(350)).await;

    life.shutdown();
    life.wait(Duration::from_secs(1)).await?;
    println!("all workers finished, state={}", life.state());
    Ok(())
}
