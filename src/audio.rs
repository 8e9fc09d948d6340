use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type Cue = Buffered<Decoder<BufReader<File>>>;

/// Audio manager for playing sound effects.
///
/// All cues are fire-and-forget. A missing output device or missing asset
/// never stops the game: the whole manager (or the individual cue) just
/// goes silent.
pub struct AudioManager {
    output: Option<AudioOutput>,
}

struct AudioOutput {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    enemy_damage: Option<Cue>,
    enemy_death: Option<Cue>,
    player_hurt: Option<Cue>,
}

impl AudioManager {
    /// Creates an audio manager and pre-buffers every cue.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            output: Some(AudioOutput {
                _stream: stream,
                stream_handle,
                enemy_damage: load_cue("assets/sounds/chomper_hit.wav"),
                enemy_death: load_cue("assets/sounds/chomper_death.wav"),
                player_hurt: load_cue("assets/sounds/player_hurt.wav"),
            }),
        })
    }

    /// A manager that plays nothing. Used by tests and headless runs.
    pub fn disabled() -> Self {
        Self { output: None }
    }

    pub fn play_enemy_damage(&self) {
        self.play(|output| output.enemy_damage.as_ref());
    }

    pub fn play_enemy_death(&self) {
        self.play(|output| output.enemy_death.as_ref());
    }

    pub fn play_player_hurt(&self) {
        self.play(|output| output.player_hurt.as_ref());
    }

    fn play(&self, pick: impl Fn(&AudioOutput) -> Option<&Cue>) {
        let Some(output) = &self.output else { return };
        let Some(cue) = pick(output) else { return };

        // Ignore playback errors - sound must never crash the game
        if let Ok(sink) = Sink::try_new(&output.stream_handle) {
            sink.set_volume(0.3);
            sink.append(cue.clone());
            sink.detach();
        }
    }
}

fn load_cue(path: impl AsRef<Path>) -> Option<Cue> {
    let file = File::open(path).ok()?;
    let source = Decoder::new(BufReader::new(file)).ok()?;
    Some(source.buffered())
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new().unwrap_or_else(|err| {
            eprintln!("Warning: Failed to initialize audio: {err}");
            eprintln!("Continuing without audio...");
            Self::disabled()
        })
    }
}
