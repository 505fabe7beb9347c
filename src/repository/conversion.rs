use poise::serenity_prelude::UserId;
use thiserror::Error;

use crate::models::SuggestionId;

/// Conversion between domain types and their SQL representations.
pub trait DBConvertible: Sized {
    type DBType;

    fn to_db(&self) -> Self::DBType;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError>;
}

#[derive(Debug, Error)]
pub enum DBFromConversionError {
    #[error("Invalid number: {0}")]
    InvalidNumber(i64),
}

impl DBConvertible for SuggestionId {
    type DBType = i64;

    fn to_db(&self) -> Self::DBType {
        self.0 as _
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        if *value < 0 {
            return Err(DBFromConversionError::InvalidNumber(*value));
        }
        Ok(SuggestionId(*value as _))
    }
}

impl DBConvertible for UserId {
    type DBType = i64;

    fn to_db(&self) -> Self::DBType {
        self.get() as _
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        if *value <= 0 {
            return Err(DBFromConversionError::InvalidNumber(*value));
        }
        Ok(UserId::new(*value as _))
    }
}
