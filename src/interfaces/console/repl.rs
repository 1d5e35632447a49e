//! Line-oriented operator console

use std::io::{self, BufRead, Write};

use tracing::debug;

use super::parser::{parse_command, Command, HELP};
use super::render;
use crate::application::{Action, Feedback, SessionController};

fn prompt(session: &SessionController) -> String {
    match (session.current_user(), session.selected()) {
        (None, _) => "guest> ".to_string(),
        (Some(user), None) => format!("{}> ", user.username),
        (Some(user), Some(slot_id)) => format!("{}@slot{}> ", user.username, slot_id),
    }
}

/// Read commands from `input` until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    session: &mut SessionController,
    input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(
        output,
        "Smart parking console ({} slots). Type 'help' for commands.",
        session.parking().num_slots()
    )?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", prompt(session))?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(output)?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", render::feedback(&Feedback::Error(e)))?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Slots => match session.board() {
                Ok((slots, summary)) => writeln!(output, "{}", render::board(slots, &summary))?,
                Err(e) => writeln!(output, "{}", render::feedback(&Feedback::Error(e)))?,
            },
            Command::Action(action) => {
                let shows_slot = matches!(action, Action::Select(_) | Action::Find(_));
                let feedback = session.dispatch(action);
                writeln!(output, "{}", render::feedback(&feedback))?;

                if shows_slot && feedback.is_success() {
                    if let Some(slot) = session.selected_slot() {
                        writeln!(output, "{}", render::slot_details(slot))?;
                    }
                }
            }
        }
    }

    if session.logout().is_some() {
        debug!("Session closed with user still logged in");
    }
    writeln!(output, "Bye")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{IdentityService, ParkingService};
    use crate::domain::{Tariff, User, UserRole};
    use crate::infrastructure::crypto::password::hash_password;
    use crate::infrastructure::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn session() -> SessionController {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
        ));
        let identity = IdentityService::new([User {
            username: "admin".into(),
            password_hash: hash_password("1234", 4).unwrap(),
            role: UserRole::Staff,
        }]);
        SessionController::new(
            ParkingService::new(8, Tariff::standard(), clock),
            Arc::new(identity),
        )
    }

    fn transcript(script: &str) -> String {
        let mut s = session();
        let mut out = Vec::new();
        run(&mut s, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn park_and_checkout_session() {
        let out = transcript(
            "login admin 1234\nselect 3\npark KA01AB1234 car\nslots\ncheckout\nquit\n",
        );
        assert!(out.contains("✅ Logged in as admin"));
        assert!(out.contains("admin@slot3> "));
        assert!(out.contains("✅ Vehicle parked in slot 3"));
        assert!(out.contains("🟥 Slot 3 - KA01AB1234 (car)"));
        assert!(out.contains("Total fare:  20.00 INR"));
        assert!(out.trim_end().ends_with("Bye"));
    }

    #[test]
    fn errors_keep_the_console_running() {
        let out = transcript("select 1\nfly\nlogin admin nope\nlogin admin 1234\nfind X\n");
        assert!(out.contains("❌ Please log in first"));
        assert!(out.contains("❌ Unknown command 'fly'"));
        assert!(out.contains("❌ Invalid credentials"));
        assert!(out.contains("❌ Not found"));
        assert!(out.contains("Bye"));
    }

    #[test]
    fn find_shows_selected_slot() {
        let out = transcript("login admin 1234\nselect 6\npark ab12 bike\nselect 1\nfind AB12\n");
        assert!(out.contains("✅ Vehicle found in slot 6"));
        assert!(out.contains("Selected: 🟥 Slot 6 - ab12 (bike)"));
    }

    #[test]
    fn guest_cannot_view_board() {
        let out = transcript(
            "login admin 1234\nselect 3\npark KA01SECRET car\nlogout\nslots\n",
        );
        let after_logout = out.split("✅ Logged out admin").nth(1).unwrap();
        assert!(after_logout.contains("❌ Please log in first"));
        assert!(!out.contains("KA01SECRET"));
    }

    #[test]
    fn overlong_plate_is_refused() {
        let out = transcript("login admin 1234\nselect 2\npark ABCDEFGHIJKLMNOPQ car\n");
        assert!(out.contains("❌ Vehicle number must be at most 16 characters"));
        assert!(!out.contains("Vehicle parked"));
    }

    #[test]
    fn prompt_tracks_session() {
        let mut s = session();
        assert_eq!(prompt(&s), "guest> ");
        s.login("admin", "1234").unwrap();
        assert_eq!(prompt(&s), "admin> ");
        s.select(2).unwrap();
        assert_eq!(prompt(&s), "admin@slot2> ");
    }
}
