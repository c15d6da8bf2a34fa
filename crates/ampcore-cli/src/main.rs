//! Thin real-time driver: wires the [`ampcore_engine::Engine`] to a `cpal`
//! input/output stream via [`ampcore_io::AudioStream`], and a stdin thread
//! for live model/cabinet reloads and preset saves.
//!
//! This binary exists to demonstrate and exercise the engine, not as a
//! product surface: it carries none of the real-time guarantees of
//! [`Engine::process`] itself, whose job is to stay out of the way of a
//! host's own audio callback.

mod args;
mod runtime_commands;

use ampcore_config::Preset;
use ampcore_engine::Engine;
use ampcore_io::{AudioStream, StreamConfig};
use clap::Parser;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = args::Cli::parse();
    let mut engine = Engine::new(cli.sample_rate as f32, cli.buffer_size as usize);

    if let Some(path) = &cli.preset {
        let preset = Preset::load(path)?;
        tracing::info!(name = %preset.name, path = %path.display(), "loading preset");
        engine.load_preset(&preset)?;
    }

    match &cli.model {
        Some(path) => engine.load_model(path)?,
        None => engine.load_model_default()?,
    }

    if let Some(path) = &cli.cabinet {
        engine.load_cabinet(path)?;
        engine.set_cabsim_bypass(false);
    }

    let engine = Arc::new(Mutex::new(engine));

    let stdin_engine = Arc::clone(&engine);
    std::thread::spawn(move || {
        runtime_commands::run(stdin_engine, std::io::stdin().lock());
    });

    let config = StreamConfig {
        sample_rate: cli.sample_rate,
        buffer_size: cli.buffer_size,
        input_device: cli.input.clone(),
        output_device: cli.output.clone(),
    };
    let mut stream = AudioStream::new(config)?;

    let stop = stream.stop_handle();
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        stop.store(false, Ordering::SeqCst);
    })?;

    println!("ampcore running. Sample rate {} Hz, buffer {} frames.", cli.sample_rate, cli.buffer_size);
    println!("Runtime commands (stdin): json <path>, cabinet <path>, reset-meters, save-preset <path>");
    println!("Press Ctrl+C to stop...\n");

    let audio_engine = Arc::clone(&engine);
    stream.run(move |input, output| {
        let mut engine = audio_engine.lock().unwrap_or_else(|e| e.into_inner());
        engine.process(input, output);
    })?;

    println!("Done!");
    Ok(())
}
