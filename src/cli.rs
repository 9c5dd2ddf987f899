// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use virt_driver::DeviceSelection;

#[derive(Parser)]
#[command(name = "virt_driver")]
#[command(author, version, about = "Cyberith Virtualizer Driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the native CybSDK library (default: $CYBSDK_NATIVE_PATH, then ./x64 or ./x86, then the system loader)
    #[arg(long, global = true, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Device to use (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub device: Option<DeviceSelection>,

    /// Enable device monitoring (logs every SDK call)
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Filter monitored calls (all, lifecycle, telemetry, haptic)
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Config file path (default: ~/.config/virt_driver/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Query Commands ===
    /// Show binding and native SDK versions
    #[command(visible_alias = "ver")]
    Version,

    /// List connected Virtualizer devices
    #[command(visible_alias = "ls")]
    List,

    /// Show USB info and firmware version of the device
    #[command(visible_alias = "i")]
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Connection check: find, open, read every value once, close
    #[command(visible_aliases = ["connect", "c"])]
    Check,

    // === Live Commands ===
    /// Live display of height, orientation, speed and direction
    #[command(visible_aliases = ["watch", "d"])]
    Data {
        /// Stop after this many samples
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Polling interval in ms (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Live jump/crouch detection (stand upright when starting)
    #[command(visible_aliases = ["jump", "crouch"])]
    Posture {
        /// Stop after this many samples
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Jump threshold in cm (overrides config)
        #[arg(long, allow_hyphen_values = true)]
        jump: Option<f32>,

        /// Crouch threshold in cm (overrides config)
        #[arg(long, allow_hyphen_values = true)]
        crouch: Option<f32>,
    },

    /// Reset player height and/or orientation
    Reset {
        /// Use the current height as the default height
        #[arg(long)]
        height: bool,

        /// Use the current orientation as the origin
        #[arg(long)]
        orientation: bool,
    },

    /// Haptic unit control
    #[command(visible_alias = "h")]
    Haptic {
        #[command(subcommand)]
        action: HapticCommands,
    },

    /// Live walker control (direction vector, speed, jump)
    #[command(visible_alias = "walk")]
    Walker {
        /// Stop after this many samples
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Speed multiplier (overrides config)
        #[arg(long)]
        scale: Option<f32>,

        /// Print one JSON object per sample
        #[arg(long)]
        json: bool,
    },

    // === Network Commands ===
    /// Stream telemetry frames over UDP
    Stream {
        /// Destination host:port, unicast or multicast (overrides config)
        #[arg(short, long)]
        target: Option<String>,

        /// Frames per second (overrides config)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=1000))]
        rate: Option<u32>,

        /// Stop after this many seconds
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Receive telemetry frames from other nodes
    Listen {
        /// Address to listen on, joins the group if multicast (default: stream target)
        #[arg(short, long)]
        addr: Option<String>,

        /// Stop after this many frames
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Also show frames carrying our own source id
        #[arg(long)]
        include_own: bool,
    },

    // === Utility Commands ===
    /// Show or initialise the config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum HapticCommands {
    /// Start the haptic signal
    Play,

    /// Stop the haptic unit
    Stop,

    /// Set gain level (0-3)
    Gain {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=3))]
        level: u8,
    },

    /// Set sine wave frequency in Hz (0-80)
    #[command(visible_alias = "freq")]
    Frequency {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=80))]
        hz: u8,
    },

    /// Set amplitude in percent (0-100)
    #[command(visible_alias = "vol")]
    Volume {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Interactive menu (toggle, gain, frequency, volume, quit)
    Menu,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "virt_driver",
            "data",
            "--device",
            "sim",
            "--monitor",
            "--filter",
            "telemetry",
            "-n",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.device, Some(DeviceSelection::Sim));
        assert!(cli.monitor);
        assert_eq!(cli.filter.as_deref(), Some("telemetry"));
        assert!(matches!(
            cli.command,
            Some(Commands::Data {
                count: Some(5),
                interval: None
            })
        ));
    }

    #[test]
    fn test_haptic_ranges() {
        assert!(Cli::try_parse_from(["virt_driver", "haptic", "gain", "3"]).is_ok());
        assert!(Cli::try_parse_from(["virt_driver", "haptic", "gain", "4"]).is_err());
        assert!(Cli::try_parse_from(["virt_driver", "haptic", "freq", "80"]).is_ok());
        assert!(Cli::try_parse_from(["virt_driver", "haptic", "frequency", "81"]).is_err());
        assert!(Cli::try_parse_from(["virt_driver", "haptic", "vol", "101"]).is_err());
    }

    #[test]
    fn test_negative_crouch_threshold() {
        let cli =
            Cli::try_parse_from(["virt_driver", "posture", "--crouch", "-20", "--jump", "8"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Posture {
                crouch: Some(c),
                jump: Some(j),
                ..
            }) if c == -20.0 && j == 8.0
        ));
    }

    #[test]
    fn test_library_help_names_search_order() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "library")
            .unwrap();
        let help = arg.get_help().unwrap().to_string();
        assert!(help.contains(cybsdk_native::LIBRARY_PATH_ENV));
        assert!(help.contains("./x64"));
        assert!(!help.contains("next to the binary"));
    }

    #[test]
    fn test_aliases() {
        assert!(matches!(
            Cli::try_parse_from(["virt_driver", "watch"]).unwrap().command,
            Some(Commands::Data { .. })
        ));
        assert!(matches!(
            Cli::try_parse_from(["virt_driver", "connect"]).unwrap().command,
            Some(Commands::Check)
        ));
    }
}
