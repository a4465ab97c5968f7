//! Parses the form-encoded request bodies for creating and editing transactions.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    transaction::{NewTransaction, TransactionChanges, core::DATE_FORMAT},
};

/// The raw fields of a create or edit request.
///
/// Every field is optional at this level so that a missing field can be told
/// apart from a field that is present but empty. Unknown fields, including
/// `user_id`, are ignored.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct TransactionForm {
    pub category_id: Option<String>,
    pub budget_id: Option<String>,
    pub goal_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TransactionForm {
    /// Decode a form-encoded request body.
    ///
    /// # Errors
    /// Returns an [Error::InvalidField] if `body` is not valid form data.
    pub fn from_bytes(body: &[u8]) -> Result<Self, Error> {
        serde_urlencoded::from_bytes(body).map_err(|error| Error::InvalidField {
            field: "body",
            reason: error.to_string(),
        })
    }

    /// Check that all fields for a new transaction are present and parse them.
    ///
    /// Fields are checked in the order category_id, budget_id, goal_id, type,
    /// amount, date, description and the first one that is missing is reported.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::MissingField] naming the first absent field,
    /// - or [Error::InvalidField] if the amount or date cannot be parsed.
    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let category_id = require("category_id", self.category_id)?;
        let budget_id = require("budget_id", self.budget_id)?;
        let goal_id = require("goal_id", self.goal_id)?;
        let transaction_type = require("type", self.transaction_type)?;
        let amount = require("amount", self.amount)?;
        let date = require("date", self.date)?;
        let description = require("description", self.description)?;

        Ok(NewTransaction {
            category_id,
            budget_id,
            goal_id,
            transaction_type,
            amount: parse_amount(&amount)?,
            date: parse_date(&date)?,
            description,
        })
    }

    /// Parse the fields that are present into a partial update.
    ///
    /// # Errors
    /// Returns an [Error::InvalidField] if the amount or date cannot be parsed.
    pub fn into_changes(self) -> Result<TransactionChanges, Error> {
        Ok(TransactionChanges {
            category_id: self.category_id,
            budget_id: self.budget_id,
            goal_id: self.goal_id,
            transaction_type: self.transaction_type,
            amount: self.amount.as_deref().map(parse_amount).transpose()?,
            date: self.date.as_deref().map(parse_date).transpose()?,
            description: self.description,
        })
    }
}

fn require(field: &'static str, value: Option<String>) -> Result<String, Error> {
    value.ok_or(Error::MissingField(field))
}

fn parse_amount(raw: &str) -> Result<f64, Error> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        Ok(_) => Err(Error::InvalidField {
            field: "amount",
            reason: format!("\"{raw}\" is not a finite number"),
        }),
        Err(error) => Err(Error::InvalidField {
            field: "amount",
            reason: format!("\"{raw}\": {error}"),
        }),
    }
}

fn parse_date(raw: &str) -> Result<Date, Error> {
    Date::parse(raw.trim(), DATE_FORMAT).map_err(|error| Error::InvalidField {
        field: "date",
        reason: format!("\"{raw}\" is not a date in the format YYYY-MM-DD: {error}"),
    })
}
