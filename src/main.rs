mod audio;
mod config;
mod machine;
mod types;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use ratatui::{backend::Backend, Terminal};
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use audio::engine::{ClipSlot, SamplerEngine};
use audio::errors::{log_playback_failures, PlaybackError};
use audio::handle::EngineHandle;
use audio::sample_loader::load_clip;
use config::MachineConfig;
use machine::{ClipPlayer, PadBank, PadDispatcher};
use types::events::PadEvent;
use ui::{app::App, events, render, terminal::TerminalSession};

/// A nine-pad sample drum machine for the terminal
#[derive(Parser, Debug)]
#[command(name = "drum-machine")]
#[command(about = "Nine-pad sample drum machine", long_about = None)]
struct Args {
    /// Configuration file (YAML); the stock kit when omitted
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Directory containing the clip files (overrides the config)
    #[arg(short = 's', long = "samples")]
    samples: Option<PathBuf>,

    /// List available audio output devices and exit
    #[arg(short = 'l', long = "list")]
    list_devices: bool,

    /// Diagnostic log file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Send pad activity to the UI roughly this many times per second
const ACTIVITY_UPDATES_PER_SECOND: u32 = 20;

/// Route tracing output to a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

/// List available audio output devices
fn list_audio_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();

    let mut devices: Vec<String> = host
        .output_devices()?
        .filter_map(|device| {
            device.description()
                .ok()
                .map(|desc| desc.name().to_string())
        })
        .collect();

    // Also try to get the default device explicitly
    if let Some(default_device) = host.default_output_device() {
        if let Ok(default_desc) = default_device.description() {
            let default_name = default_desc.name().to_string();
            if !devices.contains(&default_name) {
                devices.push(default_name);
            }
        }
    }

    Ok(devices)
}

/// Find audio device index by name or index string
fn find_audio_device(devices: &[String], search: &str) -> Result<usize> {
    // Try to parse as index first
    if let Ok(index) = search.parse::<usize>() {
        if index < devices.len() {
            return Ok(index);
        } else {
            return Err(anyhow!(
                "Audio device index {} out of range (0-{})",
                index,
                devices.len().saturating_sub(1)
            ));
        }
    }

    // Search by name (case-insensitive substring match)
    let search_lower = search.to_lowercase();
    for (i, device) in devices.iter().enumerate() {
        if device.to_lowercase().contains(&search_lower) {
            return Ok(i);
        }
    }

    Err(anyhow!("Audio device '{}' not found", search))
}

/// Pick the configured output device, or the system default
fn select_output_device(config: &MachineConfig) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match &config.devices.audioout {
        Some(search) => {
            let devices = list_audio_devices()?;
            let index = find_audio_device(&devices, search)?;
            host.output_devices()?
                .find(|device| {
                    device
                        .description()
                        .map(|desc| desc.name() == devices[index])
                        .unwrap_or(false)
                })
                .ok_or_else(|| anyhow!("Selected audio device not available"))
        }
        None => host
            .default_output_device()
            .ok_or_else(|| anyhow!("No audio output devices found")),
    }
}

/// Decode every pad's clip; failures become unavailable slots
fn load_kit(bank: &PadBank, samples_dir: &Path, channels: usize, sample_rate: u32) -> Vec<ClipSlot> {
    bank.pads()
        .iter()
        .map(|pad| {
            let path = pad.clip_path(samples_dir);
            match load_clip(&path, channels, sample_rate) {
                Ok(clip) => {
                    info!(key = %pad.key, path = %path.display(), frames = clip.frames(), "Loaded clip");
                    ClipSlot::loaded(clip)
                }
                Err(err) => {
                    warn!(key = %pad.key, path = %path.display(), error = %err, "Failed to load clip");
                    ClipSlot::unavailable(pad.key, format!("{}: {}", path.display(), err))
                }
            }
        })
        .collect()
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Handle --list flag
    if args.list_devices {
        let audio_devices = list_audio_devices()?;
        if audio_devices.is_empty() {
            println!("No audio output devices found.");
            return Ok(());
        }
        println!("Available Audio Output Devices:");
        for (i, device) in audio_devices.iter().enumerate() {
            println!("  {}: {}", i, device);
        }
        return Ok(());
    }

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("drum-machine.log"));
    init_logging(&log_path)?;

    let mut config = match &args.config {
        Some(path) => MachineConfig::load(path)?,
        None => MachineConfig::default(),
    };
    if let Some(samples) = args.samples {
        config.samples = samples;
    }

    run(config)
}

/// Start audio, take over the terminal and run until quit
fn run(config: MachineConfig) -> Result<()> {
    let bank = config.pad_bank()?;

    let device = select_output_device(&config)?;
    let supported = device.default_output_config()?;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.config();
    let num_channels = stream_config.channels as usize;
    let sample_rate = stream_config.sample_rate;

    info!(
        channels = num_channels,
        sample_rate,
        samples = %config.samples.display(),
        "Starting drum machine"
    );

    // Clips are at most stereo; extra device channels stay silent
    let slots = load_kit(&bank, &config.samples, num_channels.min(2), sample_rate);

    // UI -> audio triggers, audio -> UI failures and activity
    let (event_tx, event_rx) = crossbeam_channel::unbounded::<PadEvent>();
    let (error_tx, error_rx) = crossbeam_channel::bounded::<PlaybackError>(64);
    let (activity_tx, activity_rx) = crossbeam_channel::bounded::<Vec<bool>>(4);

    let engine = SamplerEngine::new(slots, event_rx, error_tx);

    // Start audio stream
    let _stream = match sample_format {
        cpal::SampleFormat::F32 => {
            start_audio_stream::<f32>(&device, &stream_config, engine, activity_tx, num_channels)?
        }
        cpal::SampleFormat::I16 => {
            start_audio_stream::<i16>(&device, &stream_config, engine, activity_tx, num_channels)?
        }
        cpal::SampleFormat::U16 => {
            start_audio_stream::<u16>(&device, &stream_config, engine, activity_tx, num_channels)?
        }
        other => return Err(anyhow!("Unsupported sample format: {:?}", other)),
    };

    let dispatcher = PadDispatcher::new(bank, config.initial_state(), EngineHandle::new(event_tx));
    let mut app = App::new(dispatcher);

    // Terminal is restored when the session drops, error or not
    let mut session = TerminalSession::enter()?;
    let result = run_ui_loop(&mut session.terminal, &mut app, &error_rx, &activity_rx);
    drop(session);

    info!("Drum machine stopped");
    result
}

/// Start audio stream driving the sampler engine
fn start_audio_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: SamplerEngine,
    activity_tx: Sender<Vec<bool>>,
    num_channels: usize,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let activity_interval = (config.sample_rate / ACTIVITY_UPDATES_PER_SECOND) as usize;

    // Pre-allocate buffer for processing
    let mut temp_buffer = vec![0.0f32; 512 * num_channels];
    let mut frame_counter = 0usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let frames = data.len() / num_channels;

            // Ensure temp buffer is large enough
            if temp_buffer.len() < frames * num_channels {
                temp_buffer.resize(frames * num_channels, 0.0);
            }

            engine.process(&mut temp_buffer[..frames * num_channels], num_channels);

            // Convert to output sample format
            for (out, sample) in data.iter_mut().zip(&temp_buffer[..frames * num_channels]) {
                *out = T::from_sample(sample.clamp(-1.0, 1.0));
            }

            // Periodically send pad activity to UI
            frame_counter += frames;
            if frame_counter > activity_interval {
                let _ = activity_tx.try_send(engine.active_slots());
                frame_counter = 0;
            }
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

/// Run UI loop
fn run_ui_loop<B: Backend, P: ClipPlayer>(
    terminal: &mut Terminal<B>,
    app: &mut App<P>,
    error_rx: &Receiver<PlaybackError>,
    activity_rx: &Receiver<Vec<bool>>,
) -> Result<()> {
    loop {
        // Playback failures from the audio thread go to the log only
        log_playback_failures(error_rx);

        // Update pad activity from audio thread
        while let Ok(active) = activity_rx.try_recv() {
            app.update_active_pads(active);
        }

        // Render UI
        terminal.draw(|f| render::render(f, app))?;

        // Handle events
        events::handle_events(app, terminal.size()?)?;

        // Check if should quit
        if app.should_quit {
            break;
        }

        // Small sleep to reduce CPU usage
        std::thread::sleep(Duration::from_millis(6));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<String> {
        vec![
            "Built-in Output".to_string(),
            "USB Audio Interface".to_string(),
            "HDMI".to_string(),
        ]
    }

    #[test]
    fn test_find_audio_device_by_index() {
        assert_eq!(find_audio_device(&devices(), "2").unwrap(), 2);
        assert!(find_audio_device(&devices(), "3").is_err());
    }

    #[test]
    fn test_find_audio_device_by_name() {
        assert_eq!(find_audio_device(&devices(), "usb").unwrap(), 1);
        assert_eq!(find_audio_device(&devices(), "BUILT-IN").unwrap(), 0);
        assert!(find_audio_device(&devices(), "bluetooth").is_err());
    }

    #[test]
    fn test_load_kit_marks_missing_clips_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let bank = MachineConfig::default().pad_bank().unwrap();

        let slots = load_kit(&bank, dir.path(), 2, 44100);
        assert_eq!(slots.len(), 9);
        assert!(slots
            .iter()
            .all(|slot| matches!(slot, ClipSlot::Unavailable { .. })));
    }
}
