use std::collections::HashSet;

/// AU member states flagged as least represented in the Commission's staff.
pub const DEFAULT_LEAST_REPRESENTED: [&str; 28] = [
    "Botswana",
    "Cabo Verde",
    "Central African Republic",
    "Chad",
    "Comoros",
    "Djibouti",
    "Equatorial Guinea",
    "Eritrea",
    "Eswatini",
    "Gabon",
    "Gambia",
    "Guinea-Bissau",
    "Lesotho",
    "Liberia",
    "Libya",
    "Madagascar",
    "Malawi",
    "Mauritania",
    "Mauritius",
    "Mozambique",
    "Namibia",
    "Niger",
    "Sao Tome and Principe",
    "Seychelles",
    "Sierra Leone",
    "Somalia",
    "South Sudan",
    "Togo",
];

/// Immutable set of country names. Membership is an exact, case-sensitive
/// string match against the nationality reported for a candidate.
#[derive(Debug, Clone)]
pub struct LeastRepresentedCountries {
    names: HashSet<String>,
}

impl LeastRepresentedCountries {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, nationality: Option<&str>) -> bool {
        nationality.map_or(false, |n| self.names.contains(n))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl Default for LeastRepresentedCountries {
    fn default() -> Self {
        Self::new(DEFAULT_LEAST_REPRESENTED)
    }
}
