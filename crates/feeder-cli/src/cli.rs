use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "feeder", version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Use a specific output device by substring match
    #[arg(long)]
    pub device: Option<String>,

    /// Override the hardware-preferred callback chunk size (frames)
    #[arg(long)]
    pub frames_per_buffer: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a fading test tone; Enter retriggers, `s` stops, Ctrl-C exits
    Tone {
        /// Oscillator frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        freq: f32,

        /// Fade cycle length in seconds
        #[arg(long, default_value_t = 1.0)]
        cycle_seconds: f32,

        /// Peak amplitude (0.0..=1.0 of full scale)
        #[arg(long, default_value_t = 0.8)]
        amplitude: f32,

        /// Repeat the cycle instead of falling silent after one pass
        #[arg(long = "loop")]
        looped: bool,
    },

    /// List output devices and exit
    Devices,
}
