use crate::error::MatchError;
use crate::models::{Gender, User};

/// Check whether two users may be paired
///
/// Only `male`/`female` pairs with identical intent qualify. Users whose
/// gender is `other` or unset never form an eligible pair.
pub fn check_eligibility(a: &User, b: &User) -> Result<(), MatchError> {
    match (a.gender, b.gender) {
        (Some(Gender::Male), Some(Gender::Female)) | (Some(Gender::Female), Some(Gender::Male)) => {}
        (ga, gb) => {
            return Err(MatchError::IneligiblePair(format!(
                "gender {} cannot be paired with {}",
                describe(ga),
                describe(gb)
            )));
        }
    }

    if a.intent != b.intent {
        return Err(MatchError::IneligiblePair(format!(
            "intent {} does not match {}",
            a.intent, b.intent
        )));
    }

    Ok(())
}

fn describe(gender: Option<Gender>) -> String {
    gender.map_or_else(|| "unset".to_string(), |g| g.to_string())
}
