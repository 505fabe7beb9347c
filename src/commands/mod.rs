mod games;
mod help;
mod pick;
mod sales;
mod suggest;

use crate::BotState;

pub use games::{listgames, listpastgames};
pub use help::help;
pub use pick::pick_next;
pub use sales::sales;
pub use suggest::suggest;

type CommandResult = Result<(), CommandError>;
type Context<'a> = poise::Context<'a, BotState, CommandError>;

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Duplicate { message: String },
    #[error("{message}")]
    Unauthorized { message: String },
    #[error("{message}")]
    Upstream { message: String },
    #[error("{message}")]
    Internal { message: String },
    #[error(transparent)]
    Serenity(#[from] serenity::Error),
}

impl From<crate::lookup::LookupError> for CommandError {
    fn from(err: crate::lookup::LookupError) -> CommandError {
        CommandError::Upstream {
            message: format!("The game database is unavailable right now: {err}"),
        }
    }
}

fn not_found(message: impl Into<String>) -> CommandError {
    CommandError::NotFound {
        message: message.into(),
    }
}

fn duplicate(message: impl Into<String>) -> CommandError {
    CommandError::Duplicate {
        message: message.into(),
    }
}

fn unauthorized(message: impl Into<String>) -> CommandError {
    CommandError::Unauthorized {
        message: message.into(),
    }
}

fn internal_err(message: impl Into<String>) -> CommandError {
    CommandError::Internal {
        message: message.into(),
    }
}
