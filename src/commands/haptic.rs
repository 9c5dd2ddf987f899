//! Haptic unit command handlers.

use std::io::{BufRead, Write};

use super::{clear_screen, CommandResult, Context};
use crate::cli::HapticCommands;
use cybsdk::{HapticFrequency, HapticGain, HapticVolume, Virtualizer, VirtualizerError};
use tracing::{debug, warn};

pub fn run(ctx: &Context, action: HapticCommands) -> CommandResult {
    ctx.with_device(|device| {
        if !device.has_haptic()? {
            warn!("Device reports no haptic unit");
        }
        match action {
            HapticCommands::Play => {
                device.haptic_play()?;
                println!("Haptic playing");
            }
            HapticCommands::Stop => {
                device.haptic_stop()?;
                println!("Haptic stopped");
            }
            HapticCommands::Gain { level } => {
                device.set_haptic_gain(HapticGain::try_from(level)?)?;
                println!("Gain set to {level}");
            }
            HapticCommands::Frequency { hz } => {
                device.set_haptic_frequency(HapticFrequency::new(hz)?)?;
                println!("Frequency set to {hz} Hz");
            }
            HapticCommands::Volume { percent } => {
                device.set_haptic_volume(HapticVolume::new(percent)?)?;
                println!("Volume set to {percent}%");
            }
            HapticCommands::Menu => {
                let stdin = std::io::stdin();
                menu(device, &mut stdin.lock())?;
            }
        }
        Ok(())
    })
}

/// One menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Toggle,
    Gain,
    Frequency,
    Volume,
    Quit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(Self::Toggle),
            "1" => Some(Self::Gain),
            "2" => Some(Self::Frequency),
            "3" => Some(Self::Volume),
            "4" | "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

fn prompt<R: BufRead>(input: &mut R, text: &str) -> std::io::Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn parse_level(input: &str) -> Result<u8, VirtualizerError> {
    input
        .parse::<u8>()
        .map_err(|_| VirtualizerError::InvalidParameter(format!("Not a number: {input}")))
}

/// Interactive haptic menu
///
/// Quitting (or end of input) stops the haptic unit.
pub(crate) fn menu<R: BufRead>(device: &Virtualizer, input: &mut R) -> CommandResult {
    let mut active = false;
    loop {
        // Not fatal when stdout is not a terminal
        let _ = clear_screen();
        let Some(line) = prompt(
            input,
            "Choose function:\n\
             0: Toggle active\n\
             1: Set Gain\n\
             2: Set Frequency\n\
             3: Set Volume\n\
             4: Quit\n\
             Function: ",
        )?
        else {
            break;
        };

        let Some(choice) = MenuChoice::parse(&line) else {
            println!("Unknown selection: {line}");
            continue;
        };
        debug!("Menu selection {:?}", choice);

        let result = match choice {
            MenuChoice::Toggle => {
                if active {
                    device.haptic_stop()?;
                } else {
                    device.haptic_play()?;
                }
                active = !active;
                Ok(())
            }
            MenuChoice::Gain => {
                let Some(v) = prompt(input, "Set Gain (0-3): ")? else {
                    break;
                };
                parse_level(&v)
                    .and_then(HapticGain::try_from)
                    .and_then(|g| device.set_haptic_gain(g))
            }
            MenuChoice::Frequency => {
                let Some(v) = prompt(input, "Set Frequency (0-80): ")? else {
                    break;
                };
                parse_level(&v)
                    .and_then(HapticFrequency::new)
                    .and_then(|f| device.set_haptic_frequency(f))
            }
            MenuChoice::Volume => {
                let Some(v) = prompt(input, "Set Volume (0-100): ")? else {
                    break;
                };
                parse_level(&v)
                    .and_then(HapticVolume::new)
                    .and_then(|vol| device.set_haptic_volume(vol))
            }
            MenuChoice::Quit => break,
        };
        if let Err(e) = result {
            println!("{e}");
        }
    }

    device.haptic_stop()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cybsdk_native::SimulatedDevice;
    use std::io::Cursor;
    use std::sync::Arc;

    fn open_sim() -> (Arc<SimulatedDevice>, Virtualizer) {
        let sim = Arc::new(SimulatedDevice::new());
        let device = Virtualizer::new(sim.clone());
        device.open().unwrap();
        (sim, device)
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("0\n"), Some(MenuChoice::Toggle));
        assert_eq!(MenuChoice::parse(" 3 "), Some(MenuChoice::Volume));
        assert_eq!(MenuChoice::parse("q"), Some(MenuChoice::Quit));
        assert_eq!(MenuChoice::parse("9"), None);
    }

    #[test]
    fn test_menu_sets_values() {
        let (sim, device) = open_sim();
        let mut input = Cursor::new("1\n2\n2\n60\n3\n80\n0\n");
        menu(&device, &mut input).unwrap();

        let state = sim.haptic_state();
        assert_eq!(state.gain, 2);
        assert_eq!(state.frequency, 60);
        assert_eq!(state.volume, 80);
        // End of input stops the unit
        assert!(!state.playing);
    }

    #[test]
    fn test_menu_rejects_out_of_range() {
        let (sim, device) = open_sim();
        let mut input = Cursor::new("1\n7\n3\n101\n2\nloud\n4\n");
        menu(&device, &mut input).unwrap();

        let state = sim.haptic_state();
        assert_eq!(state.gain, 0);
        assert_eq!(state.volume, 0);
    }

    #[test]
    fn test_menu_toggle_then_quit_stops() {
        let (sim, device) = open_sim();
        let mut input = Cursor::new("0\n");
        // Toggle on, then EOF
        menu(&device, &mut input).unwrap();
        assert!(!sim.haptic_state().playing);
    }
}
