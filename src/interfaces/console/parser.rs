//! Console command parsing

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::application::Action;
use crate::domain::{DomainError, DomainResult, SlotId, VehicleType};

/// One line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(Action),
    /// Show the slot board
    Slots,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login <username> <password>                 log in
  logout                                      log out
  slots                                       show all slots
  select <id>                                 select a slot
  park <plate> <car|bike|heavy>               park in the selected slot now
  reserve <plate> <type> <YYYY-MM-DD> <HH:MM> pre-book the selected slot
  arrived                                     start parking on a reservation
  checkout                                    remove vehicle and print receipt
  find <plate>                                search a vehicle by number
  help                                        show this help
  quit                                        leave the session";

fn usage(text: &str) -> DomainError {
    DomainError::Validation(format!("Usage: {}", text))
}

pub fn parse_command(line: &str) -> DomainResult<Command> {
    let mut parts = line.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Err(DomainError::Validation("Empty command".into()));
    };
    let args: Vec<&str> = parts.collect();

    let command = match (keyword.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("login", [username, password]) => Command::Action(Action::Login {
            username: username.to_string(),
            password: password.to_string(),
        }),
        ("login", _) => return Err(usage("login <username> <password>")),

        ("logout", []) => Command::Action(Action::Logout),
        ("slots" | "ls", []) => Command::Slots,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,

        ("select", [id]) => Command::Action(Action::Select(parse_slot_id(id)?)),
        ("select", _) => return Err(usage("select <id>")),

        ("park", [plate, vehicle_type]) => Command::Action(Action::ParkNow {
            plate: plate.to_string(),
            vehicle_type: vehicle_type.parse::<VehicleType>()?,
        }),
        ("park", _) => return Err(usage("park <plate> <car|bike|heavy>")),

        ("reserve", [plate, vehicle_type, date, time]) => Command::Action(Action::Reserve {
            plate: plate.to_string(),
            vehicle_type: vehicle_type.parse::<VehicleType>()?,
            reserve_time: parse_reserve_time(date, time)?,
        }),
        ("reserve", _) => return Err(usage("reserve <plate> <type> <YYYY-MM-DD> <HH:MM>")),

        ("arrived", []) => Command::Action(Action::Arrived),
        ("checkout", []) => Command::Action(Action::Checkout),

        ("find", [plate]) => Command::Action(Action::Find(plate.to_string())),
        ("find", _) => return Err(usage("find <plate>")),

        (other, _) => {
            return Err(DomainError::Validation(format!(
                "Unknown command '{}', type 'help'",
                other
            )))
        }
    };

    Ok(command)
}

fn parse_slot_id(raw: &str) -> DomainResult<SlotId> {
    raw.parse::<SlotId>()
        .map_err(|_| DomainError::Validation(format!("'{}' is not a slot number", raw)))
}

fn parse_reserve_time(date: &str, time: &str) -> DomainResult<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| DomainError::Validation(format!("Invalid date '{}': {}", date, e)))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|e| DomainError::Validation(format!("Invalid time '{}': {}", time, e)))?;
    Ok(date.and_time(time))
}
