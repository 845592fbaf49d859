//! Line parser for the interactive `play` shell.

use rogue_core::Command;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellInput {
    Turn(Command),
    /// Let the autopilot pick this turn's command.
    Auto,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  m <room>      move to a neighboring room
  a <creature>  attack a monster in your room
  u <item>      use an item from your inventory
  p             pick up every item in the room
  f             flee from combat
  n             do nothing this turn
  auto          let the autopilot choose
  s             show status
  h             this help
  q             quit";

pub fn parse_line(line: &str) -> Result<ShellInput, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command, type h for help".to_string());
    };
    let argument = words.next();
    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument {extra:?}"));
    }

    let verb = verb.to_ascii_lowercase();
    let turn = |command| Ok::<_, String>(ShellInput::Turn(command));
    match (verb.as_str(), argument) {
        ("m" | "move", Some(room)) => turn(Command::Move { room: room.to_string() }),
        ("a" | "attack", Some(target)) => turn(Command::Attack { target: target.to_string() }),
        ("u" | "use", Some(item)) => turn(Command::Use { item: item.to_string() }),
        ("m" | "move" | "a" | "attack" | "u" | "use", None) => Err(format!("{verb} needs an id")),
        ("p" | "pickup", None) => turn(Command::Pickup),
        ("f" | "flee", None) => turn(Command::Flee),
        ("n" | "wait", None) => turn(Command::DoNothing),
        ("auto", None) => Ok(ShellInput::Auto),
        ("s" | "status", None) => Ok(ShellInput::Status),
        ("h" | "help" | "?", None) => Ok(ShellInput::Help),
        ("q" | "quit", None) => Ok(ShellInput::Quit),
        (
            "p" | "pickup" | "f" | "flee" | "n" | "wait" | "auto" | "s" | "status" | "h" | "help"
            | "?" | "q" | "quit",
            Some(extra),
        ) => Err(format!("{verb} takes no argument, got {extra:?}")),
        (other, _) => Err(format!("unknown command {other:?}, type h for help")),
    }
}
