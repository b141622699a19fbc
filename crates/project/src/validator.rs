use crate::NewProject;

/// One field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate the fields of a new project. Returns every problem found rather
/// than stopping at the first.
pub fn validate_new_project(input: &NewProject) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.street.trim().is_empty() {
        errors.push(ValidationError::new("street", "Street address is required"));
    }
    if input.city.trim().is_empty() {
        errors.push(ValidationError::new("city", "City is required"));
    }
    if input.zip.trim().is_empty() {
        errors.push(ValidationError::new("zip", "ZIP code is required"));
    }
    let state = input.state.trim();
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(ValidationError::new(
            "state",
            "State must be a two-letter abbreviation",
        ));
    }
    if input.is_auction {
        let missing = input
            .auction_details
            .as_ref()
            .map(|d| d.date.trim().is_empty())
            .unwrap_or(true);
        if missing {
            errors.push(ValidationError::new(
                "auctionDetails",
                "Auction date is required for auction listings",
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuctionDetails;

    fn valid_input() -> NewProject {
        NewProject {
            street: "101 Ocean Dr".to_string(),
            city: "Miami".to_string(),
            state: "FL".to_string(),
            zip: "33139".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_new_project(&valid_input()).is_empty());
    }

    #[test]
    fn test_collects_all_problems() {
        let input = NewProject::default();
        let errors = validate_new_project(&input);
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"street"));
        assert!(fields.contains(&"city"));
        assert!(fields.contains(&"zip"));
        assert!(fields.contains(&"state"));
    }

    #[test]
    fn test_state_must_be_two_letters() {
        let mut input = valid_input();
        input.state = "Florida".to_string();
        assert_eq!(validate_new_project(&input)[0].field, "state");
    }

    #[test]
    fn test_auction_requires_details() {
        let mut input = valid_input();
        input.is_auction = true;
        assert_eq!(validate_new_project(&input)[0].field, "auctionDetails");

        input.auction_details = Some(AuctionDetails {
            date: "2026-09-01".to_string(),
            auction_type: "reserve".to_string(),
            premium: "10%".to_string(),
        });
        assert!(validate_new_project(&input).is_empty());
    }
}
