use crate::cli::{Commands, GoalCommand, TxCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Tx { command } => match command {
            TxCommand::Add { json, .. }
            | TxCommand::List { json, .. }
            | TxCommand::Delete { json, .. } => *json,
        },
        Commands::Summary { json } | Commands::Breakdown { json } | Commands::History { json } => {
            *json
        }
        Commands::Goal { command } => match command {
            GoalCommand::Set { json, .. } | GoalCommand::Progress { json, .. } => *json,
        },
    };

    if json { OutputMode::Json } else { OutputMode::Text }
}
