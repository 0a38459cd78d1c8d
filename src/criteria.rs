// Search criteria for one flight-offer search
use chrono::NaiveDate;

// One search as the user submits it: a one-way route, a travel date and the
// number of adult passengers. Built fresh per search and never mutated.
// Airport codes and the adult count are validated by the form layer before
// they reach this type; they are transmitted exactly as supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u32,
}

impl SearchCriteria {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: NaiveDate,
        adults: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_date,
            adults,
        }
    }

    // Encode the criteria as the query parameters the backend expects,
    // in a fixed order: origin, destination, date (ISO), adults.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("origin", self.origin.clone()),
            ("destination", self.destination.clone()),
            ("date", self.departure_date.format("%Y-%m-%d").to_string()),
            ("adults", self.adults.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    #[test]
    fn test_query_encoding_order_and_values() {
        let criteria = SearchCriteria::new("IAH", "DEL", june_10(), 1);

        let query = criteria.to_query();
        assert_eq!(
            query,
            vec![
                ("origin", "IAH".to_string()),
                ("destination", "DEL".to_string()),
                ("date", "2025-06-10".to_string()),
                ("adults", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_date_is_zero_padded_iso() {
        let criteria = SearchCriteria::new("LHR", "JFK", NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), 2);

        let query = criteria.to_query();
        assert_eq!(query[2], ("date", "2026-01-05".to_string()));
        assert_eq!(query[3], ("adults", "2".to_string()));
    }
}
