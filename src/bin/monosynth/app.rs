//! Desktop audio sink: cpal output stream driving the engine

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use monosynth::{
    io::render_interleaved,
    sequencing::{Sequence, Sequencer},
    synth::{
        config::InputMode,
        message::{SynthHandle, MESSAGE_QUEUE_SIZE},
    },
    SynthConfig, SynthEngine,
};

pub fn run(mut config: SynthConfig, duration: Option<f32>) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    // the device decides the rate; the engine follows it
    config.sample_rate = supported.sample_rate().0 as f32;
    let channels = (supported.channels() as usize).max(1);

    tracing::info!(
        device = %device.name().unwrap_or_else(|_| "unknown".into()),
        sample_rate = config.sample_rate,
        channels,
        buffer_frames = config.buffer_frames,
        "opened output device"
    );

    let mut engine = SynthEngine::from_config(&config);
    let (mut handle, mut rx) = SynthHandle::channel(MESSAGE_QUEUE_SIZE);

    let mut sequencer = match config.input_mode {
        InputMode::Sequencer => {
            let sequence = Sequence::preset(&config.sequence);
            tracing::info!(
                sequence = %sequence.name,
                notes = sequence.len(),
                seconds = sequence.duration(),
                "playing sequence"
            );
            Some(Sequencer::new(sequence, config.sample_rate).looping(true))
        }
        InputMode::Tone => None,
    };

    let buffer_size = match supported.buffer_size() {
        cpal::SupportedBufferSize::Range { min, max }
            if (*min..=*max).contains(&config.buffer_frames) =>
        {
            cpal::BufferSize::Fixed(config.buffer_frames)
        }
        _ => {
            tracing::warn!(
                requested = config.buffer_frames,
                "buffer size not supported by device, using its default"
            );
            cpal::BufferSize::Default
        }
    };
    let mut stream_config: cpal::StreamConfig = supported.into();
    stream_config.buffer_size = buffer_size;

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _| {
                engine.process_messages(&mut rx);

                let Some(sequencer) = sequencer.as_mut() else {
                    render_interleaved(&mut engine, data, channels);
                    return;
                };

                // split the block at each sequencer event
                let frames = data.len() / channels;
                let mut cursor = 0;
                sequencer.advance(frames as u64, |offset, msg| {
                    let offset = offset as usize;
                    render_interleaved(
                        &mut engine,
                        &mut data[cursor * channels..offset * channels],
                        channels,
                    );
                    engine.handle_message(msg);
                    cursor = offset;
                });
                render_interleaved(&mut engine, &mut data[cursor * channels..], channels);
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    if config.input_mode == InputMode::Tone {
        tracing::info!(frequency = config.default_frequency, "playing tone");
        handle.note_on(config.default_frequency);
    }

    let deadline = duration
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| Instant::now() + Duration::from_secs_f32(secs));
    match deadline {
        Some(_) => tracing::info!("playing for {:.1} s", duration.unwrap_or_default()),
        None => tracing::info!("playing, press Ctrl+C to stop"),
    }

    loop {
        std::thread::sleep(Duration::from_millis(100));
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break;
        }
    }

    handle.all_notes_off();
    // let the callback pick up the note-off before the stream drops
    std::thread::sleep(Duration::from_millis(50));
    tracing::info!("stopped");
    Ok(())
}
