//! Ball in a Box entry point
//!
//! Headless host: starts the simulation and runs the field's redraw cadence,
//! logging each frame instead of painting it. `RUST_LOG=debug` shows more.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ball_box::sim::ChannelObserver;
use ball_box::{BallEvent, Field, MovementSimulator, Simulation, SimulationSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Ball in a Box starting...");

    let settings = SimulationSettings::load();
    log::debug!("Effective settings: {}", settings.to_json()?);
    let repaint_delay = settings.repaint_delay();
    let run_for = settings.run_duration_secs.map(Duration::from_secs);

    let simulation = MovementSimulator::new(settings)?;
    let field = Field::attach(&simulation);

    let (event_tx, event_rx) = std::sync::mpsc::channel();
    simulation.register_observer(Arc::new(ChannelObserver::new(event_tx)));

    simulation.start_movement();

    let started = Instant::now();
    loop {
        if run_for.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }

        for event in event_rx.try_iter() {
            match event {
                BallEvent::Active => {
                    let velocity = simulation.ball_snapshot().velocity;
                    log::info!("{} (velocity {velocity:?})", field.status());
                }
                BallEvent::Inactive => {
                    let snapshot = serde_json::to_string(&simulation.ball_snapshot())?;
                    log::info!("{} {snapshot}", field.status());
                }
            }
        }

        if field.is_repainting() {
            let frame = field.frame(&simulation);
            log::debug!("frame {}", serde_json::to_string(&frame)?);
        }

        std::thread::sleep(repaint_delay);
    }

    simulation.stop();
    log::info!("Done after {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}
