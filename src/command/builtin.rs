//! Commands every runtime ships with

use super::{Command, CommandContext};
use crate::display::LineColor;
use crate::error::{Result, TickError};

/// The default command list, in registration order
pub fn commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(TestCommand),
        Box::new(HelpCommand),
        Box::new(SettingsCommand),
        Box::new(StatusCommand),
        Box::new(EchoCommand),
    ]
}

/// Logs a debug line; handy for checking the pipeline end to end
pub struct TestCommand;

impl Command for TestCommand {
    fn name(&self) -> &str {
        "test"
    }

    fn summary(&self) -> &str {
        "Print a debug line"
    }

    fn process(&self, _args: &[&str], ctx: &CommandContext<'_>) -> Result<bool> {
        ctx.log.debug("test");
        Ok(true)
    }
}

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> &[&str] {
        &["?", "commands"]
    }

    fn summary(&self) -> &str {
        "List available commands"
    }

    fn process(&self, _args: &[&str], ctx: &CommandContext<'_>) -> Result<bool> {
        ctx.log.info("Available commands:");
        for info in ctx.catalog {
            let mut line = format!("  {}", info.name);
            if !info.aliases.is_empty() {
                line.push_str(&format!(" ({})", info.aliases.join(", ")));
            }
            if !info.summary.is_empty() {
                line.push_str(&format!(" - {}", info.summary));
            }
            ctx.log.info(&line);
        }
        Ok(true)
    }
}

/// Adjusts presentation settings on the display
///
/// - `settings font <size>`
/// - `settings color <name>`
pub struct SettingsCommand;

impl SettingsCommand {
    fn font(args: &[&str], ctx: &CommandContext<'_>) -> Result<bool> {
        let Some(raw) = args.first() else {
            ctx.log.error("Not enough arguments!");
            return Ok(false);
        };
        let size: u16 = raw
            .parse()
            .map_err(|_| TickError::InvalidArgument(format!("'{}' is not a valid font size", raw)))?;
        if size == 0 {
            return Err(TickError::InvalidArgument("font size must be at least 1".to_string()));
        }

        ctx.display
            .run_on_owning_thread(Box::new(move |surface| surface.set_font_size(size)));
        ctx.log.info(&format!("Font size changed to {}.", size));
        Ok(true)
    }

    fn color(args: &[&str], ctx: &CommandContext<'_>) -> Result<bool> {
        let Some(raw) = args.first() else {
            ctx.log.error("Not enough arguments!");
            return Ok(false);
        };
        let color: LineColor = raw.parse()?;

        ctx.display
            .run_on_owning_thread(Box::new(move |surface| surface.set_input_color(color)));
        ctx.log.info(&format!("Input color changed to {}.", color));
        Ok(true)
    }
}

impl Command for SettingsCommand {
    fn name(&self) -> &str {
        "settings"
    }

    fn aliases(&self) -> &[&str] {
        &["set"]
    }

    fn summary(&self) -> &str {
        "Change display settings: font <size>, color <name>"
    }

    fn process(&self, args: &[&str], ctx: &CommandContext<'_>) -> Result<bool> {
        let Some((setting, rest)) = args.split_first() else {
            let colors: Vec<String> = LineColor::ALL.iter().map(|c| c.to_string()).collect();
            ctx.log.info("Available settings:");
            ctx.log.info("  font <size>");
            ctx.log.info(&format!("  color <{}>", colors.join("|")));
            return Ok(true);
        };

        match setting.to_ascii_lowercase().as_str() {
            "font" => Self::font(rest, ctx),
            "color" => Self::color(rest, ctx),
            other => {
                ctx.log.warning(&format!("Unknown setting '{}'.", other));
                Ok(false)
            }
        }
    }
}

/// Reports every registered loop
pub struct StatusCommand;

impl Command for StatusCommand {
    fn name(&self) -> &str {
        "status"
    }

    fn aliases(&self) -> &[&str] {
        &["loops"]
    }

    fn summary(&self) -> &str {
        "Show the state of every loop"
    }

    fn process(&self, _args: &[&str], ctx: &CommandContext<'_>) -> Result<bool> {
        let Some(loops) = &ctx.loops else {
            return Err(TickError::InvalidState("the loop registry is gone".to_string()));
        };

        let snapshot = loops.snapshot();
        if snapshot.is_empty() {
            ctx.log.info("No loops registered.");
            return Ok(true);
        }
        for lp in snapshot {
            ctx.log.info(&format!(
                "{}: {} at {} TPS, {} ticks",
                lp.name(),
                lp.state(),
                lp.effective_rate(),
                lp.tick_count()
            ));
        }
        Ok(true)
    }
}

pub struct EchoCommand;

impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn summary(&self) -> &str {
        "Print the arguments back"
    }

    fn process(&self, args: &[&str], ctx: &CommandContext<'_>) -> Result<bool> {
        if args.is_empty() {
            ctx.log.error("Not enough arguments!");
            return Ok(false);
        }
        ctx.log.info(&args.join(" "));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandHandler;
    use crate::display::{self, Display, DisplayPump, LineColor, Transcript};
    use crate::logging::MasterLog;
    use crate::scheduler::{LoopHook, LoopRegistry, TickLoop};
    use std::sync::{Arc, Weak};

    struct Idle;

    impl LoopHook for Idle {
        fn on_tick(&self, _this: &TickLoop) -> Result<()> {
            Ok(())
        }
    }

    struct Fixture {
        handler: CommandHandler,
        pump: DisplayPump,
        _logs: MasterLog,
    }

    fn fixture(loops: Weak<LoopRegistry>) -> Fixture {
        let (handle, pump) = display::channel();
        pump.set_ready(true);
        let display: Arc<dyn Display> = Arc::new(handle);
        let logs = MasterLog::new(display.clone());
        let handler = CommandHandler::new(commands(), logs.logger("CommandHandler"), display, loops).unwrap();
        Fixture {
            handler,
            pump,
            _logs: logs,
        }
    }

    impl Fixture {
        fn run(&self, line: &str) -> (bool, Transcript) {
            let ok = self.handler.process_command(line);
            let mut transcript = Transcript::new();
            self.pump.pump(&mut transcript);
            (ok, transcript)
        }
    }

    #[test]
    fn test_default_commands_do_not_conflict() {
        let f = fixture(Weak::new());
        assert_eq!(f.handler.catalog().len(), 5);
    }

    #[test]
    fn test_test_command_any_case() {
        let f = fixture(Weak::new());
        for line in ["TEST", "test", "TeSt"] {
            let (ok, transcript) = f.run(line);
            assert!(ok);
            assert_eq!(transcript.lines.len(), 1);
            assert!(transcript.lines[0].0.ends_with("[Debug] [CommandHandler] test"));
            assert_eq!(transcript.lines[0].1, LineColor::White);
        }
    }

    #[test]
    fn test_settings_font() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("settings font 14");
        assert!(ok);
        assert_eq!(transcript.font_size, 14);
        assert!(transcript.contains_message("Font size changed to 14."));
        assert_eq!(transcript.lines[0].1, LineColor::LightGray);
    }

    #[test]
    fn test_settings_font_via_alias() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("SET font 20");
        assert!(ok);
        assert_eq!(transcript.font_size, 20);
    }

    #[test]
    fn test_settings_font_missing_size() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("settings font");
        assert!(!ok);
        assert_eq!(transcript.font_size, display::DEFAULT_FONT_SIZE);
        assert_eq!(transcript.lines.len(), 1);
        assert!(transcript.contains_message("Not enough arguments!"));
        assert_eq!(transcript.lines[0].1, LineColor::Red);
    }

    #[test]
    fn test_settings_font_not_a_number() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("settings font huge");
        assert!(!ok);
        assert_eq!(transcript.font_size, display::DEFAULT_FONT_SIZE);
        assert!(transcript.contains_message(
            "Error when executing the command 'settings': Invalid argument: 'huge' is not a valid font size"
        ));
    }

    #[test]
    fn test_settings_color() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("settings color yellow");
        assert!(ok);
        assert_eq!(transcript.input_color, LineColor::Yellow);
        assert!(transcript.contains_message("Input color changed to Yellow."));

        let (ok, transcript) = f.run("settings color purple");
        assert!(!ok);
        assert_eq!(transcript.input_color, LineColor::White);
    }

    #[test]
    fn test_settings_without_args_lists_options() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("settings");
        assert!(ok);
        assert!(transcript.contains_message("font <size>"));
        assert!(transcript.contains_message("color <LightGray|White|Yellow|Red>"));
    }

    #[test]
    fn test_settings_unknown() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("settings volume 3");
        assert!(!ok);
        assert!(transcript.contains_message("Unknown setting 'volume'."));
    }

    #[test]
    fn test_help_lists_every_command() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("?");
        assert!(ok);
        assert!(transcript.contains_message("Available commands:"));
        assert!(transcript.contains_message("  help (?, commands) - List available commands"));
        for name in ["test", "settings (set)", "status (loops)", "echo"] {
            assert!(transcript.texts().iter().any(|t| t.contains(&format!("  {}", name))));
        }
    }

    #[test]
    fn test_status_reports_loops() {
        let registry = Arc::new(LoopRegistry::new());
        let logs = MasterLog::new(Arc::new(display::NullDisplay));
        TickLoop::create(&registry, &logs, "Idle", 8, Box::new(Idle)).unwrap();

        let f = fixture(Arc::downgrade(&registry));
        let (ok, transcript) = f.run("loops");
        assert!(ok);
        assert!(transcript.contains_message("Idle: Constructed at 8 TPS, 0 ticks"));
    }

    #[test]
    fn test_status_without_registry_fails() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("status");
        assert!(!ok);
        assert!(transcript.contains_message("Invalid state: the loop registry is gone"));
    }

    #[test]
    fn test_echo() {
        let f = fixture(Weak::new());
        let (ok, transcript) = f.run("echo hello   world");
        assert!(ok);
        assert!(transcript.contains_message("[Info] [CommandHandler] hello world"));

        let (ok, _) = f.run("echo");
        assert!(!ok);
    }
}
