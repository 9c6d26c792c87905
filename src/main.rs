use std::thread;

use crossbeam_channel::bounded;
use log::{error, info, warn};

use gesturehub::config::AppConfig;
use gesturehub::dispatch::CommandDispatcher;
use gesturehub::logger;
use gesturehub::pipeline::Pipeline;
use gesturehub::source::SimulatedSource;
use gesturehub::types::SystemCommand;

fn main() {
    logger::init_logger();
    info!("Application starting");

    let config = match AppConfig::load_or_default("config.toml") {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (command_tx, command_rx) = bounded::<SystemCommand>(config.channels.command_queue_capacity);

    // Stand-in system-control consumer: logs what a real controller would
    // execute (volume, screenshot, media keys).
    let consumer = thread::spawn(move || {
        while let Ok(command) = command_rx.recv() {
            info!("executing: {}", command);
        }
    });

    let source = SimulatedSource::new(&config);
    let dispatcher = CommandDispatcher::new(command_tx);

    let pipeline = match Pipeline::start(config, source, dispatcher) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to start pipeline: {}", e);
            std::process::exit(1);
        }
    };

    info!("Press Enter to stop");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);

    let report = pipeline.shutdown();
    if let Some(fault) = &report.fault {
        warn!("pipeline ended with source fault: {}", fault);
    }
    if !report.drained_cleanly {
        warn!("pipeline did not drain before the deadline");
    }
    info!("run metrics: {}", report.metrics);

    // The dispatcher dropped with the pipeline, so the consumer sees
    // end-of-stream and exits.
    if consumer.join().is_err() {
        error!("command consumer panicked");
    }
    info!("Application stopped");
}
