//! Stdin command loop: lets a running session reload the model/cabinet,
//! reset meters, or save the current parameter surface without restarting
//! the process.
//!
//! Mirrors [`ampcore_engine::Engine`]'s string-keyed state surface, plus one
//! CLI-only command (`save-preset`) that isn't part of that surface.

use ampcore_engine::Engine;
use std::io::BufRead;
use std::sync::{Arc, Mutex};

/// Block reading lines from `input` until EOF, applying each as a runtime
/// command against `engine`. Intended to run on its own thread alongside the
/// audio stream.
///
/// Recognized commands:
/// - `json <path>` / `json` - load a model, or the embedded default
/// - `cabinet <path>` / `cabinet` - load a cabinet IR, or the embedded default
/// - `reset-meters` - clear accumulated peak meters
/// - `save-preset <path>` - snapshot the current parameter surface to a TOML file
pub fn run(engine: Arc<Mutex<Engine>>, input: impl BufRead) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        let mut engine = engine.lock().unwrap_or_else(|e| e.into_inner());
        let result = match command {
            "save-preset" => engine.save_preset_to_file("cli", arg),
            key => engine.apply_state(key, arg),
        };
        drop(engine);

        if let Err(e) = result {
            tracing::error!(command, error = %e, "runtime command failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_meters_command_clears_peaks() {
        let mut engine = Engine::new(48000.0, 256);
        let input = vec![1.0f32; 2048];
        let mut output = vec![0.0f32; 2048];
        engine.process(&input, &mut output);
        assert!(engine.meters().input_peak() > 0.0);

        let engine = Arc::new(Mutex::new(engine));
        run(Arc::clone(&engine), "reset-meters\n".as_bytes());

        let mut engine = engine.lock().unwrap();
        engine.process(&vec![0.0; 1], &mut vec![0.0; 1]);
        assert_eq!(engine.meters().input_peak(), 0.0);
    }

    #[test]
    fn unknown_command_is_logged_and_does_not_panic() {
        let engine = Arc::new(Mutex::new(Engine::new(48000.0, 256)));
        run(engine, "bogus whatever\n".as_bytes());
    }

    #[test]
    fn save_preset_command_writes_a_file() {
        let engine = Arc::new(Mutex::new(Engine::new(48000.0, 256)));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");
        let line = format!("save-preset {}\n", path.display());
        run(engine, line.as_bytes());
        assert!(path.exists());
    }
}
