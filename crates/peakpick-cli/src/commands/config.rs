use anyhow::Result;
use peakpick_cli::ConfigCommands;

pub fn handle(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { config } => {
            let config = config.resolve()?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
