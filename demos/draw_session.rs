//! Draw Session
//!
//! This example runs three draws on a virtual clock and prints the result
//! panel while the binary digits are revealed.
//!
//! Key concepts:
//! - A controller assembled from injected collaborators
//! - Reveal progress driven by a manual timeline
//! - Recent winners excluded from the next draw
//! - History persisted to a directory and annotated with memos
//!
//! Run with: cargo run --example draw_session

use bitdraw::controller::{DrawController, DrawPhase};
use bitdraw::display::ResultPanel;
use bitdraw::history::FileStore;
use bitdraw::schedule::VirtualClock;
use bitdraw::selector::RandomSelector;
use std::time::Duration;

fn main() {
    println!("=== Draw Session Example ===\n");

    let dir = std::env::temp_dir().join("bitdraw-demo");
    let mut controller = DrawController::builder()
        .selector(RandomSelector::seeded(2024))
        .storage(FileStore::new(&dir))
        .scheduler(VirtualClock::new())
        .display(ResultPanel::new())
        .build()
        .unwrap();

    if let Some(warning) = controller.load_warning() {
        println!("history not loaded: {warning}");
    }
    println!("{} earlier draws in {}", controller.history().len(), dir.display());

    for issue in controller.update_configuration("12", "0.4") {
        println!("config: {issue}");
    }

    for round in 1..=3 {
        println!("\n--- Draw {round} ---");
        controller.start_draw();

        while controller.phase() == DrawPhase::Animating {
            let completed = controller.advance_clock(Duration::from_millis(400));
            println!("{}\n", controller.display().render());

            for draw in completed {
                println!("winner {} at {}", draw.record.winner(), draw.record.timestamp());
                if let Some(warning) = draw.persisted.warning() {
                    println!("not saved: {warning}");
                }
            }
        }
    }

    let _ = controller.set_memo_on_latest("door prize");

    println!("\n--- History ---");
    for record in controller.history() {
        println!("{}", record.summary());
    }

    println!("\n=== Example Complete ===");
}
